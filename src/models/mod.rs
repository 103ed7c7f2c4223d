pub mod asn;
pub mod confidence;
pub mod error;
pub mod turnover;
