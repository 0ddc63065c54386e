use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn append_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

/// Text in, text out. Any `Err` is treated as "no response" by the engine.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke(&self, prompt: &str) -> Result<String>;

    /// Model identifier used in session logs.
    fn describe(&self) -> String;
}

#[async_trait]
impl<T: ModelInvoker + ?Sized> ModelInvoker for Box<T> {
    async fn invoke(&self, prompt: &str) -> Result<String> {
        (**self).invoke(prompt).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
