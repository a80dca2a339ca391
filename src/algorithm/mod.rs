/// Memoisation of backgrounds and encoded outputs per session
pub mod cache;
/// Panel, text and cover decoration of cropped backgrounds
pub mod compositor;
/// Inline and background execution contexts
pub mod engine;
/// Batch orchestration from request to encoded outputs
pub mod executor;
/// Seeded placement and painting of the master surface
pub mod scatter;
