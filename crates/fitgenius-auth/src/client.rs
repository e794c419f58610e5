use aws_sdk_cognitoidentityprovider::Client;

/// Build a Cognito Identity Provider client from an already-loaded shared config.
pub fn client_from_config(config: &aws_config::SdkConfig) -> Client {
    Client::new(config)
}
