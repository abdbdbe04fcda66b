pub use totem::invoker::handler;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    totem::setup_logging();
    lambda_runtime::run(lambda_runtime::service_fn(handler)).await
}
