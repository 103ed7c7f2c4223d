pub mod asn;
pub mod confidence;
pub mod turnover;
