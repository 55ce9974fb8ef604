use crate::utils::error::Result;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove_file(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait DrawSettings: Send + Sync {
    fn drawing_name(&self) -> &str;
    fn year(&self) -> i32;
    fn seed(&self) -> Option<u64>;
    /// `None` retries until a drawing completes.
    fn max_attempts(&self) -> Option<u64>;
    fn output_path(&self) -> &str;
}
