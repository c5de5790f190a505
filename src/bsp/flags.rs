//! Surface and content flags as Quake 3 defines them.  RTCW and ET share the common subset, which
//! is all we look at.

bitflags! {
    pub struct SurfaceFlags: u32 {
        const NODAMAGE = 0x1;
        const SLICK = 0x2;
        const SKY = 0x4;
        const LADDER = 0x8;
        const NOIMPACT = 0x10;
        const NOMARKS = 0x20;
        const FLESH = 0x40;
        const NODRAW = 0x80;
        const HINT = 0x100;
        const SKIP = 0x200;
        const NOLIGHTMAP = 0x400;
        const POINTLIGHT = 0x800;
        const METALSTEPS = 0x1000;
        const NOSTEPS = 0x2000;
        const NONSOLID = 0x4000;
        const LIGHTFILTER = 0x8000;
        const ALPHASHADOW = 0x10000;
        const NODLIGHT = 0x20000;
        const DUST = 0x40000;
    }
}

bitflags! {
    pub struct ContentFlags: u32 {
        const SOLID = 0x1;
        const LAVA = 0x8;
        const SLIME = 0x10;
        const WATER = 0x20;
        const FOG = 0x40;
        const TRANSLUCENT = 0x2000_0000;
        const TRIGGER = 0x4000_0000;
        const NODROP = 0x8000_0000;
    }
}

impl SurfaceFlags {
    /// Never rendered at all, so there's no point in writing a shader for it.
    pub fn is_invisible(&self) -> bool {
        self.intersects(SurfaceFlags::NODRAW | SurfaceFlags::SKIP | SurfaceFlags::HINT)
    }
}
