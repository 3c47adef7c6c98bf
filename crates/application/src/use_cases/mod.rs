pub mod forwarding;

pub use forwarding::ForwardingEngine;
