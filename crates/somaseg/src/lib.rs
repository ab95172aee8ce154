#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use somaseg_volume as volume;

#[doc(inline)]
pub use somaseg_imgproc as imgproc;

#[doc(inline)]
pub use somaseg_snakes as snakes;

#[doc(inline)]
pub use somaseg_detect as detect;
