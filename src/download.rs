use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::error::{FetchError, Result};
use crate::progress::create_progress_bar;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36";

/// Size of one ranged request when the stream length is known
pub const CHUNK_SIZE: u64 = 10 * 1024 * 1024;

/// Shared HTTP client with default headers
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    show_progress: bool,
}

impl HttpClient {
    pub fn new(show_progress: bool) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            show_progress,
        })
    }

    /// Execute HTTP request with error handling
    async fn execute(&self, request: reqwest::RequestBuilder, url: &str) -> Result<reqwest::Response> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::RequestTimeout(url.to_string())
            } else {
                FetchError::Network(e)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(FetchError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            })
        }
    }

    /// POST a JSON body and parse the JSON response
    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
        headers: HeaderMap,
    ) -> Result<T> {
        let request = self.client.post(url).headers(headers).json(body);
        let response = self.execute(request, url).await?;
        response.json::<T>().await.map_err(FetchError::from)
    }

    /// Stream `url` into `dest`.
    ///
    /// Bytes land in `<dest>.part` first; the file is renamed to `dest` only once
    /// every byte has been written, and the partial file is removed on failure.
    pub async fn download_to_file(
        &self,
        url: &str,
        dest: &Path,
        total: Option<u64>,
        headers: HeaderMap,
    ) -> Result<PathBuf> {
        let part = part_path(dest);
        let label = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let pb = create_progress_bar(total, &label, self.show_progress);

        let result = self.write_ranges(url, &part, total, headers, |n| pb.inc(n)).await;
        match result {
            Ok(written) => {
                pb.finish_and_clear();
                tokio::fs::rename(&part, dest).await?;
                log::debug!("wrote {} bytes to {}", written, dest.display());
                Ok(dest.to_path_buf())
            }
            Err(e) => {
                pb.abandon();
                if let Err(rm) = tokio::fs::remove_file(&part).await {
                    log::warn!("could not remove {}: {}", part.display(), rm);
                }
                Err(e)
            }
        }
    }

    async fn write_ranges(
        &self,
        url: &str,
        part: &Path,
        total: Option<u64>,
        headers: HeaderMap,
        mut on_chunk: impl FnMut(u64),
    ) -> Result<u64> {
        let mut file = tokio::fs::File::create(part).await?;
        let mut written = 0u64;

        let urls = match total {
            Some(total) if total > 0 => ranged_urls(url, total)?,
            _ => vec![url.to_string()],
        };

        for chunk_url in urls {
            let request = self.client.get(&chunk_url).headers(headers.clone());
            let response = self.execute(request, url).await?;
            let mut stream = response.bytes_stream();
            while let Some(bytes) = stream.next().await {
                let bytes = bytes?;
                file.write_all(&bytes).await?;
                written += bytes.len() as u64;
                on_chunk(bytes.len() as u64);
            }
        }

        file.flush().await?;
        if let Some(expected) = total
            && expected > 0
            && written != expected
        {
            return Err(FetchError::SizeMismatch {
                url: url.to_string(),
                expected,
                actual: written,
            });
        }
        Ok(written)
    }
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

/// Split a download into `range=start-end` requests of at most [`CHUNK_SIZE`] bytes
pub fn ranged_urls(url: &str, total: u64) -> Result<Vec<String>> {
    let base = Url::parse(url)?;
    let mut urls = Vec::new();
    let mut start = 0;
    while start < total {
        let end = (start + CHUNK_SIZE).min(total) - 1;
        let mut chunk = base.clone();
        chunk
            .query_pairs_mut()
            .append_pair("range", &format!("{start}-{end}"));
        urls.push(chunk.to_string());
        start = end + 1;
    }
    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    #[test]
    fn test_ranged_urls_cover_whole_stream() {
        let total = CHUNK_SIZE * 2 + 5;
        let urls = ranged_urls("https://example.com/videoplayback?id=1", total).unwrap();
        assert_eq!(urls.len(), 3);
        assert!(urls[0].ends_with(&format!("range=0-{}", CHUNK_SIZE - 1)));
        assert!(urls[1].ends_with(&format!("range={}-{}", CHUNK_SIZE, CHUNK_SIZE * 2 - 1)));
        assert!(urls[2].ends_with(&format!("range={}-{}", CHUNK_SIZE * 2, total - 1)));
        assert!(urls[0].contains("id=1"));
    }

    #[test]
    fn test_ranged_urls_small_stream() {
        let urls = ranged_urls("https://example.com/v", 100).unwrap();
        assert_eq!(urls, vec!["https://example.com/v?range=0-99".to_string()]);
    }

    #[test]
    fn test_ranged_urls_rejects_bad_url() {
        assert!(matches!(ranged_urls("not a url", 10), Err(FetchError::Url(_))));
    }

    #[test]
    fn test_part_path() {
        assert_eq!(
            part_path(Path::new("/tmp/song.m4a")),
            PathBuf::from("/tmp/song.m4a.part")
        );
    }

    /// Serve every connection with the same canned response.
    ///
    /// Returns the stream URL and the request lines received so far.
    async fn serve(status: &'static str, body: &'static [u8]) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let line = String::from_utf8_lossy(&request)
                    .lines()
                    .next()
                    .unwrap_or_default()
                    .to_string();
                seen.lock().unwrap().push(line);

                let head = format!(
                    "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(body).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{addr}/videoplayback?id=1"), requests)
    }

    #[tokio::test]
    async fn test_download_renames_part_on_success() {
        let (url, _) = serve("200 OK", b"hello world").await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("clip.mp4");

        let client = HttpClient::new(false).unwrap();
        let saved = client
            .download_to_file(&url, &dest, None, HeaderMap::new())
            .await
            .unwrap();

        assert_eq!(saved, dest);
        assert_eq!(std::fs::read(&dest).unwrap(), b"hello world");
        assert!(!part_path(&dest).exists());
    }

    #[tokio::test]
    async fn test_download_known_size_uses_range() {
        let (url, requests) = serve("200 OK", b"0123456789").await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("song.m4a");

        let client = HttpClient::new(false).unwrap();
        client
            .download_to_file(&url, &dest, Some(10), HeaderMap::new())
            .await
            .unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"0123456789");
        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].contains("range=0-9"), "{}", requests[0]);
    }

    #[tokio::test]
    async fn test_download_http_error_leaves_nothing() {
        let (url, _) = serve("404 Not Found", b"gone").await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("clip.mp4");

        let client = HttpClient::new(false).unwrap();
        let result = client.download_to_file(&url, &dest, None, HeaderMap::new()).await;

        assert!(matches!(result, Err(FetchError::Http { status: 404, .. })));
        assert!(!dest.exists());
        assert!(!part_path(&dest).exists());
    }

    #[tokio::test]
    async fn test_download_size_mismatch_is_an_error() {
        let (url, _) = serve("200 OK", b"short").await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("song.m4a");

        let client = HttpClient::new(false).unwrap();
        let result = client
            .download_to_file(&url, &dest, Some(12), HeaderMap::new())
            .await;

        assert!(matches!(
            result,
            Err(FetchError::SizeMismatch {
                expected: 12,
                actual: 5,
                ..
            })
        ));
        assert!(!dest.exists());
        assert!(!part_path(&dest).exists());
    }
}
