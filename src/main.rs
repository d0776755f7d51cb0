mod allocator;
mod classify;
mod conflict;
mod data;
mod records;
mod server;
mod shuffle;
mod timeslot;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    server::run_server().await;
}
