use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::config::{BehaviorVersion, Region};
use fitgenius_bedrock::backend::{BedrockBackend, Guardrail};

fn offline_client() -> Client {
    Client::from_conf(
        aws_sdk_bedrockruntime::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build(),
    )
}

#[test]
fn no_guardrail_by_default() {
    let backend = BedrockBackend::new(offline_client(), "amazon.nova-pro-v1:0");
    assert_eq!(backend.model_id(), "amazon.nova-pro-v1:0");
    assert!(backend.guardrail().is_none());
}

#[test]
fn guardrail_is_attached_to_every_call() {
    let backend = BedrockBackend::new(offline_client(), "amazon.nova-pro-v1:0").with_guardrail(
        &Guardrail {
            identifier: "gr-fitness".to_string(),
            version: "3".to_string(),
        },
    );

    let config = backend.guardrail().unwrap();
    assert_eq!(config.guardrail_identifier(), "gr-fitness");
    assert_eq!(config.guardrail_version(), "3");
}
