pub mod connectors {
    pub mod destination;
    pub mod source;
}

pub mod convert;
pub mod error;
pub mod health;
pub mod sync;
pub mod watermark;
