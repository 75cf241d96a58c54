pub mod buf;

pub use buf::GrowBuf;
