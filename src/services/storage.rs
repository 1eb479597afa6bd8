use anyhow::{Result, anyhow};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

pub struct StoredFile {
    pub hash: String,
    pub size: u64,
    pub key: String,
}

#[async_trait]
pub trait StorageService: Send + Sync {
    /// Streams `reader` to `key` while computing its SHA-256 and size.
    async fn store_stream_with_hash<'a>(
        &self,
        key: &str,
        reader: Box<dyn AsyncRead + Unpin + Send + 'a>,
    ) -> Result<StoredFile>;
    /// Moves a stored object to a new key.
    async fn promote(&self, source_key: &str, dest_key: &str) -> Result<()>;
    async fn delete_file(&self, key: &str) -> Result<()>;
    async fn file_exists(&self, key: &str) -> Result<bool>;
    async fn read_file(&self, key: &str) -> Result<Vec<u8>>;
}

/// Keeps evidence files under a local upload directory.
pub struct LocalStorageService {
    root: PathBuf,
}

impl LocalStorageService {
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a key below the root. Absolute keys and `..` are refused.
    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let is_plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));

        if key.is_empty() || !is_plain {
            tracing::warn!("Refusing storage key outside upload root: {}", key);
            return Err(anyhow!("Invalid storage key: {}", key));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl StorageService for LocalStorageService {
    async fn store_stream_with_hash<'a>(
        &self,
        key: &str,
        mut reader: Box<dyn AsyncRead + Unpin + Send + 'a>,
    ) -> Result<StoredFile> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&path).await?;
        match copy_with_hash(reader.as_mut(), &mut file).await {
            Ok((hash, size)) => Ok(StoredFile {
                hash,
                size,
                key: key.to_string(),
            }),
            Err(e) => {
                drop(file);
                // A failed stream leaves no partial object behind
                if let Err(cleanup) = fs::remove_file(&path).await {
                    tracing::warn!("Failed to remove partial file {}: {}", key, cleanup);
                }
                Err(e)
            }
        }
    }

    async fn promote(&self, source_key: &str, dest_key: &str) -> Result<()> {
        let source = self.path_for(source_key)?;
        let dest = self.path_for(dest_key)?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::rename(&source, &dest).await?;
        Ok(())
    }

    async fn delete_file(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn file_exists(&self, key: &str) -> Result<bool> {
        let path = self.path_for(key)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn read_file(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path_for(key)?;
        Ok(fs::read(&path).await?)
    }
}

/// Copies `reader` into `file`, returning the hex SHA-256 and byte count.
async fn copy_with_hash<R>(reader: &mut R, file: &mut fs::File) -> Result<(String, u64)>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut hasher = Sha256::new();
    let mut total_size: u64 = 0;
    let mut buffer = vec![0u8; 64 * 1024];

    loop {
        let n = reader.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
        file.write_all(&buffer[..n]).await?;
        total_size += n as u64;
    }
    file.flush().await?;

    Ok((hex::encode(hasher.finalize()), total_size))
}
