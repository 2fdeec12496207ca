mod inner;
mod replier;

use crate::inner::IrcFelixClientInner;

use std::sync::Arc;

use felix_common::config::client::ConfigClientIrc;
use felix_core::{
    error::ClientError,
    interface::{client::FelixClient, server::FelixServer},
};
use futures::{future::BoxFuture, prelude::*};

#[derive(Debug)]
pub struct IrcFelixClient<S>(Arc<IrcFelixClientInner<S>>);

impl<S: FelixServer> IrcFelixClient<S> {
    pub fn new(config: &ConfigClientIrc, server: S) -> IrcFelixClient<S> {
        let inner = IrcFelixClientInner::new(config, server);
        IrcFelixClient(Arc::new(inner))
    }
}

impl<S: FelixServer> FelixClient for IrcFelixClient<S> {
    fn execute(&self) -> BoxFuture<'static, Result<(), ClientError>> {
        let cloned_inner = self.0.clone();
        async {
            cloned_inner.execute().await?;
            Ok(())
        }
        .boxed()
    }
}
