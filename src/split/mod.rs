//! Train/test partitioning that keeps already-compromised cards out of the test set.

mod partitioner;

pub use partitioner::{LeakagePartitioner, TrainTestSplit};
