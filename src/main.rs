// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::Context;
use floe_iris::bifrost::{Bifrost, BroadcastObservers, TracingSink};
use floe_iris::bus::{forward, ChannelBus, TracingBus};
use floe_iris::config::{load_config, RuntimeConfig};
use floe_iris::engine::{Iris, TaskGroup};
use floe_iris::node::kinds::{NodeFactory, OrderReceiver};
use std::env;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match env::args().nth(1) {
        Some(path) => load_config(&path).with_context(|| format!("loading {}", path))?,
        None => RuntimeConfig::default(),
    };

    let (bus, mut frames) = ChannelBus::new(config.bus.get_channel_capacity());
    let bifrost = Arc::new(Bifrost::new(&config.bifrost, Arc::new(TracingSink)));
    let iris = Iris::new(Arc::new(bus), bifrost.clone());

    NodeFactory::build_all(&iris, &config.nodes)?;
    if iris.get(floe_iris::config::consts::ORDER_RECEIVER_PID).is_none() {
        OrderReceiver::with_default_pid(&iris);
    }
    let summary = iris.wire()?;
    tracing::info!(nodes = summary.nodes, resolved = summary.resolved, "Graph ready");

    let observers = Arc::new(BroadcastObservers::new(config.bifrost.get_queue_capacity()));
    bifrost.attach(observers.clone());

    let mut tasks = TaskGroup::new();
    tasks.spawn("bus-link", |token| async move {
        forward(&mut frames, &TracingBus, &token).await;
    });
    let mut observer = observers.subscribe();
    tasks.spawn("observer", |token| async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                frame = observer.recv() => match frame {
                    Ok(frame) => tracing::info!(target: "observer", "{}", frame),
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!(target: "observer", missed, "Observer lagged")
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                },
            }
        }
    });
    let poll_interval = config.bifrost.get_poll_interval();
    tasks.spawn("bifrost-drain", move |token| async move {
        bifrost.drain(poll_interval, token).await;
    });

    tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;
    tasks.shutdown().await;
    Ok(())
}
