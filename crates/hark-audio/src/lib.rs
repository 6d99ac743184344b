pub mod capture;
pub mod device;
pub mod stream;
pub mod wav;

pub use capture::capture;
pub use device::{DeviceNegotiator, FALLBACK_RATES};
pub use stream::InputStream;
pub use wav::{read_wav, write_wav};
