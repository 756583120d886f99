pub mod influx {
    pub mod client;
    pub mod error;
    pub mod query;
}

pub mod sql {
    pub mod base {
        pub mod driver;
        pub mod error;
    }

    pub mod postgres {
        pub mod row;
        pub mod source;
        pub mod utils;
    }
}
