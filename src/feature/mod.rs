/// Features: state, actions and the reducers that transition them
///
/// - product.rs: product browsing, filters, wishlist cache
/// - tasting.rs: tasting note form backed by the cellar table
/// - effect.rs: runs product effects and feeds their results back
pub mod effect;
pub mod product;
pub mod tasting;
