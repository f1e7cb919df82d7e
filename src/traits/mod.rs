pub mod bus;
pub mod node;
pub mod observer;

pub use bus::{BusFrame, BusTransport};
pub use node::Node;
pub use observer::{LogSink, ObserverManager};
