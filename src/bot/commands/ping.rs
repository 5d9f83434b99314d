use std::time::{Duration, Instant};

use serenity::client::Context;

use crate::{
    bot::{context::CommandContext, state::ShardManagerContainer},
    error::CommandResult,
};

pub async fn ping(ctx: &CommandContext<'_>) -> CommandResult {
    let started = Instant::now();
    ctx.send_str("Pinging...").await?;
    let round_trip = started.elapsed();

    let gateway = match shard_latency(ctx.ctx).await {
        Some(latency) => format!("{}ms", latency.as_millis()),
        None => "not measured yet".to_owned(),
    };

    ctx.send_str(format!(
        "Pong! Gateway latency: {} | Round trip: {}ms",
        gateway,
        round_trip.as_millis()
    ))
    .await
}

// Heartbeat latency of the shard this interaction came in on
async fn shard_latency(ctx: &Context) -> Option<Duration> {
    let manager = {
        let data = ctx.data.read().await;
        data.get::<ShardManagerContainer>()?.clone()
    };

    let runners = manager.runners.lock().await;
    runners.get(&ctx.shard_id)?.latency
}
