//! Stats module - Aggregations over loaded tables

mod aggregator;

pub use aggregator::{
    AggregateEntry, AggregateError, AggregateResult, Aggregator, GroupKey, MeltedTriple,
};
