pub mod png_io;
pub mod preview;

pub use png_io::{decode_png, encode_png, load_png, DecodedImage};
pub use preview::render_preview;
