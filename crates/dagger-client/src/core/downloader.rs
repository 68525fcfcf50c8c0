use std::{
    io::{copy, Write},
    path::{Path, PathBuf},
};

use eyre::Context;
use flate2::read::GzDecoder;
use platform_info::{PlatformInfoAPI, UNameAPI};
use sha2::Digest;
use tar::Archive;

use crate::errors::DaggerError;

const CLI_BIN_PREFIX: &str = "dagger-";
const CLI_BASE_URL: &str = "https://dl.dagger.io/dagger/releases";

#[derive(Clone, Debug, PartialEq)]
pub struct Platform {
    pub os: String,
    pub arch: String,
}

impl Platform {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        let os: String = os.into();
        let arch: String = arch.into();
        let arch = match arch.to_lowercase().as_str() {
            "x86_64" => "amd64".to_string(),
            "aarch" | "aarch64" => "arm64".to_string(),
            other => other.to_string(),
        };

        Self {
            os: os.to_lowercase(),
            arch,
        }
    }

    pub fn from_system() -> eyre::Result<Platform> {
        let platform = platform_info::PlatformInfo::new()
            .map_err(|e| eyre::eyre!("unable to determine platform information: {e}"))?;

        Ok(Self::new(
            platform.sysname().to_string_lossy(),
            platform.machine().to_string_lossy(),
        ))
    }
}

pub type CliVersion = String;

/// Fetches the dagger CLI for the current platform into the user cache.
pub struct Downloader {
    version: CliVersion,
    platform: Platform,
}

impl Downloader {
    pub fn new(version: CliVersion) -> eyre::Result<Self> {
        Ok(Self::with_platform(version, Platform::from_system()?))
    }

    pub fn with_platform(version: CliVersion, platform: Platform) -> Self {
        Self { version, platform }
    }

    pub fn archive_url(&self) -> String {
        let ext = match self.platform.os.as_str() {
            "windows" => "zip",
            _ => "tar.gz",
        };
        let version = &self.version;
        let os = &self.platform.os;
        let arch = &self.platform.arch;

        format!("{CLI_BASE_URL}/{version}/dagger_v{version}_{os}_{arch}.{ext}")
    }

    pub fn checksum_url(&self) -> String {
        let version = &self.version;

        format!("{CLI_BASE_URL}/{version}/checksums.txt")
    }

    pub fn cache_dir(&self) -> eyre::Result<PathBuf> {
        let path = cache_dir_from(std::env::var("XDG_CACHE_HOME").ok())?;

        std::fs::create_dir_all(&path)?;

        Ok(path)
    }

    pub fn cli_path(&self, cache_dir: &Path) -> PathBuf {
        let path = cache_dir.join(format!("{CLI_BIN_PREFIX}{}", self.version));
        if self.platform.os == "windows" {
            return path.with_extension("exe");
        }
        path
    }

    pub async fn get_cli(&self) -> Result<PathBuf, DaggerError> {
        let cache_dir = self.cache_dir().map_err(DaggerError::DownloadClient)?;
        let cli_bin_path = self.cli_path(&cache_dir);

        if cli_bin_path.exists() {
            return Ok(cli_bin_path);
        }

        tracing::info!(version = %self.version, path = %cli_bin_path.display(), "downloading dagger CLI");

        self.download(&cache_dir, cli_bin_path)
            .await
            .context("failed to download CLI from archive")
            .map_err(DaggerError::DownloadClient)
    }

    async fn download(&self, cache_dir: &Path, path: PathBuf) -> eyre::Result<PathBuf> {
        let expected_checksum = self.expected_checksum().await?;

        let archive = self.fetch_archive().await?;
        let actual_checksum = sha256_hex(&archive);

        if expected_checksum != actual_checksum {
            eyre::bail!("downloaded CLI binary checksum: {actual_checksum} doesn't match checksum from checksums.txt: {expected_checksum}")
        }

        let mut bytes = vec![];
        if self.archive_url().ends_with(".zip") {
            eyre::bail!("zip archives are not supported, install the dagger CLI and set _EXPERIMENTAL_DAGGER_CLI_BIN")
        }
        extract_from_tar(&archive, &mut bytes)?;

        // write next to the final location, then rename, so a partial
        // download never looks like a cached binary
        let mut file = tempfile::NamedTempFile::new_in(cache_dir)?;
        file.write_all(bytes.as_slice())?;
        set_executable(file.path())?;
        file.persist(&path)?;

        Ok(path)
    }

    async fn expected_checksum(&self) -> eyre::Result<String> {
        let archive_url = self.archive_url();
        let archive_name = archive_url
            .rsplit('/')
            .next()
            .ok_or(eyre::eyre!("could not get file_name from archive_url"))?;

        let resp = reqwest::get(self.checksum_url()).await?;
        let resp = resp.error_for_status()?;
        let checksums = resp.text().await?;

        find_checksum(&checksums, archive_name)
            .ok_or(eyre::eyre!("could not find a matching version or binary in checksums.txt"))
    }

    async fn fetch_archive(&self) -> eyre::Result<Vec<u8>> {
        let resp = reqwest::get(self.archive_url()).await?;
        let resp = resp.error_for_status()?;

        Ok(resp.bytes().await?.to_vec())
    }
}

fn cache_dir_from(xdg_cache_home: Option<String>) -> eyre::Result<PathBuf> {
    let mut path = match xdg_cache_home.as_deref().map(str::trim) {
        None | Some("") => dirs::cache_dir().ok_or(eyre::eyre!(
            "could not find cache_dir, either in env or XDG_CACHE_HOME"
        ))?,
        Some(path) => PathBuf::from(path),
    };

    path.push("dagger");

    Ok(path)
}

fn find_checksum(checksums: &str, archive_name: &str) -> Option<String> {
    checksums.lines().find_map(|line| {
        let mut content = line.split_whitespace();
        let checksum = content.next()?;
        let file_name = content.next()?;

        (file_name == archive_name).then(|| checksum.to_string())
    })
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = sha2::Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn extract_from_tar(archive: &[u8], output: &mut Vec<u8>) -> eyre::Result<()> {
    let mut archive = Archive::new(GzDecoder::new(archive));

    for entry in archive.entries()? {
        let mut entry = entry?;
        let path = entry.path()?;

        if path.ends_with("dagger") {
            copy(&mut entry, output)?;

            return Ok(());
        }
    }

    eyre::bail!("could not find a matching file")
}

#[cfg(unix)]
fn set_executable(path: &Path) -> eyre::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> eyre::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use flate2::{write::GzEncoder, Compression};
    use pretty_assertions::assert_eq;

    use super::{
        cache_dir_from, extract_from_tar, find_checksum, sha256_hex, Downloader, Platform,
    };

    fn linux_amd64() -> Downloader {
        Downloader::with_platform("0.10.3".into(), Platform::new("Linux", "x86_64"))
    }

    #[test]
    fn test_platform_normalizes_arch() {
        assert_eq!(Platform::new("Linux", "aarch64").arch, "arm64");
        assert_eq!(Platform::new("Darwin", "x86_64"), Platform::new("darwin", "amd64"));
    }

    #[test]
    fn test_urls() {
        let downloader = linux_amd64();

        assert_eq!(
            downloader.archive_url(),
            "https://dl.dagger.io/dagger/releases/0.10.3/dagger_v0.10.3_linux_amd64.tar.gz"
        );
        assert_eq!(
            downloader.checksum_url(),
            "https://dl.dagger.io/dagger/releases/0.10.3/checksums.txt"
        );
    }

    #[test]
    fn test_cli_path() {
        let dir = PathBuf::from("/cache/dagger");

        assert_eq!(
            linux_amd64().cli_path(&dir),
            PathBuf::from("/cache/dagger/dagger-0.10.3")
        );

        let windows =
            Downloader::with_platform("0.10.3".into(), Platform::new("Windows", "x86_64"));
        assert_eq!(
            windows.cli_path(&dir),
            PathBuf::from("/cache/dagger/dagger-0.10.3.exe")
        );
    }

    #[test]
    fn test_cache_dir_prefers_xdg() {
        assert_eq!(
            cache_dir_from(Some("/tmp/xdg".into())).unwrap(),
            PathBuf::from("/tmp/xdg/dagger")
        );
    }

    #[test]
    fn test_find_checksum() {
        let checksums = "\
aaaa  dagger_v0.10.3_darwin_arm64.tar.gz
bbbb  dagger_v0.10.3_linux_amd64.tar.gz
";

        assert_eq!(
            find_checksum(checksums, "dagger_v0.10.3_linux_amd64.tar.gz"),
            Some("bbbb".to_string())
        );
        assert_eq!(find_checksum(checksums, "dagger_v0.10.3_linux_arm64.tar.gz"), None);
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    fn tarball(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
        for (name, contents) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(contents.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder.append_data(&mut header, name, *contents).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    #[test]
    fn test_extract_from_tar() {
        let archive = tarball(&[("LICENSE", &b"license text"[..]), ("dagger", &b"#!binary"[..])]);

        let mut out = vec![];
        extract_from_tar(&archive, &mut out).unwrap();

        assert_eq!(out, b"#!binary".to_vec());
    }

    #[test]
    fn test_extract_from_tar_without_binary() {
        let archive = tarball(&[("README.md", &b"hello"[..])]);

        let mut out = vec![];
        assert!(extract_from_tar(&archive, &mut out).is_err());
    }
}
