mod decimal;
mod resample;

pub use self::{
    decimal::{decimals_of, quantize, round},
    resample::{cumulative_distances, euclidean, length, resample},
};
