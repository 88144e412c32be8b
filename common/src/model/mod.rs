pub mod basemap;
pub mod bounds;
pub mod earthquake;
pub mod magnitude;
