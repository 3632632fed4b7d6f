//! NATS test infrastructure

use async_nats::Client;
use testcontainers::ContainerAsync;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::nats::Nats;

/// Test NATS wrapper that ensures proper cleanup
///
/// The container is stopped and removed when this struct is dropped.
///
/// ```no_run
/// use test_utils::TestNats;
///
/// # async fn example() {
/// let nats = TestNats::new().await;
/// let client = nats.client();
/// # }
/// ```
pub struct TestNats {
    #[allow(dead_code)]
    container: ContainerAsync<Nats>,
    client: Client,
    pub connection_string: String,
}

impl TestNats {
    /// Start a core NATS server container and connect to it
    pub async fn new() -> Self {
        let container = Nats::default()
            .start()
            .await
            .expect("Failed to start NATS container");

        let host_port = container
            .get_host_port_ipv4(4222)
            .await
            .expect("Failed to get NATS port");

        let connection_string = format!("nats://127.0.0.1:{}", host_port);

        let client = async_nats::connect(&connection_string)
            .await
            .expect("Failed to connect to NATS");

        tracing::info!(port = host_port, "Test NATS ready");

        Self {
            container,
            client,
            connection_string,
        }
    }

    /// Get a cloned client (useful for passing to services)
    pub fn client(&self) -> Client {
        self.client.clone()
    }

    /// Get the connection string for manual client creation
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }
}

impl Drop for TestNats {
    fn drop(&mut self) {
        tracing::debug!("Cleaning up test NATS container");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    #[ignore = "needs a Docker daemon"]
    async fn test_nats_request_reply() {
        let nats = TestNats::new().await;
        let client = nats.client();

        let mut subscriber = client.subscribe("test.echo").await.unwrap();
        let responder = {
            let client = client.clone();
            tokio::spawn(async move {
                let message = subscriber.next().await.expect("No message received");
                let reply = message.reply.expect("Request without reply subject");
                client.publish(reply, message.payload).await.unwrap();
                client.flush().await.unwrap();
            })
        };

        let response = tokio::time::timeout(
            tokio::time::Duration::from_secs(5),
            client.request("test.echo", "hello".into()),
        )
        .await
        .expect("Timeout waiting for reply")
        .unwrap();

        assert_eq!(response.payload.as_ref(), b"hello");
        responder.await.unwrap();
    }
}
