use aws_sdk_s3::Client;

/// S3 client for the bucket backend. Region and credentials come from the
/// standard AWS environment chain.
pub async fn build_client() -> Client {
    let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    tracing::debug!(region = ?config.region(), "s3 client configured");
    Client::new(&config)
}
