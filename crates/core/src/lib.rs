pub mod blurring;
pub mod detection;
pub mod events;
pub mod pipeline;
pub mod shared;
pub mod storage;
