mod inner;
mod replier;

use crate::inner::DiscordFelixClientInner;

use std::sync::Arc;

use felix_common::config::client::ConfigClientDiscord;
use felix_core::{
    error::ClientError,
    interface::{client::FelixClient, server::FelixServer},
};
use futures::{future::BoxFuture, prelude::*};

pub struct DiscordFelixClient<S>(Arc<DiscordFelixClientInner<S>>);

impl<S: FelixServer> DiscordFelixClient<S> {
    pub fn new(config: &ConfigClientDiscord, server: S) -> DiscordFelixClient<S> {
        let inner = DiscordFelixClientInner::new(config, server);
        DiscordFelixClient(Arc::new(inner))
    }
}

impl<S: FelixServer> FelixClient for DiscordFelixClient<S> {
    fn execute(&self) -> BoxFuture<'static, Result<(), ClientError>> {
        let cloned = self.0.clone();
        async move {
            cloned.execute().await?;
            Ok(())
        }
        .boxed()
    }
}
