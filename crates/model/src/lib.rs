pub mod core {
    pub mod data_type;
    pub mod utils;
    pub mod value;
}

pub mod records {
    pub mod batch;
    pub mod error;
    pub mod point;
    pub mod precision;
    pub mod row;
}
