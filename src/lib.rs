pub mod basefold;
pub mod code;
pub mod errors;
pub mod fiat_shamir;
pub mod merkle_tree;
pub mod parameters;
pub mod poly;
pub mod utils;
