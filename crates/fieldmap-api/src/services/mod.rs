mod area;
mod overlay;

pub use area::AreaService;
pub use overlay::OverlayService;
