//! src/bench/workload.rs
//! The fixed workload vocabulary, the user's selection, and input files.

use crate::consts::{
    DEFAULT_TEST_FILE_DCF_CBC, DEFAULT_TEST_FILE_DCF_CTR, DEFAULT_TEST_FILE_MP4,
    DEFAULT_TEST_FILE_PDCF_CBC, DEFAULT_TEST_FILE_PDCF_CTR,
};
use crate::error::BenchError;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// One benchmark. Declaration order is execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Workload {
    AesBlockEncrypt,
    AesBlockDecrypt,
    AesCbcStreamEncrypt,
    AesCbcStreamDecrypt,
    AesCtrStream,
    ReadSamples,
    ReadSamplesDcfCbc,
    ReadSamplesDcfCtr,
    ReadSamplesPdcfCbc,
    ReadSamplesPdcfCtr,
}

impl Workload {
    pub const ALL: [Workload; 10] = [
        Workload::AesBlockEncrypt,
        Workload::AesBlockDecrypt,
        Workload::AesCbcStreamEncrypt,
        Workload::AesCbcStreamDecrypt,
        Workload::AesCtrStream,
        Workload::ReadSamples,
        Workload::ReadSamplesDcfCbc,
        Workload::ReadSamplesDcfCtr,
        Workload::ReadSamplesPdcfCbc,
        Workload::ReadSamplesPdcfCtr,
    ];

    /// Command-line name.
    pub const fn name(self) -> &'static str {
        match self {
            Workload::AesBlockEncrypt => "aes-block-encrypt",
            Workload::AesBlockDecrypt => "aes-block-decrypt",
            Workload::AesCbcStreamEncrypt => "aes-cbc-stream-encrypt",
            Workload::AesCbcStreamDecrypt => "aes-cbc-stream-decrypt",
            Workload::AesCtrStream => "aes-ctr-stream",
            Workload::ReadSamples => "read-samples",
            Workload::ReadSamplesDcfCbc => "read-samples-dcf-cbc",
            Workload::ReadSamplesDcfCtr => "read-samples-dcf-ctr",
            Workload::ReadSamplesPdcfCbc => "read-samples-pdcf-cbc",
            Workload::ReadSamplesPdcfCtr => "read-samples-pdcf-ctr",
        }
    }

    /// Report line label.
    pub const fn label(self) -> &'static str {
        match self {
            Workload::AesBlockEncrypt => "AES Block Encryption",
            Workload::AesBlockDecrypt => "AES Block Decryption",
            Workload::AesCbcStreamEncrypt => "AES CBC Stream Encryption",
            Workload::AesCbcStreamDecrypt => "AES CBC Stream Decryption",
            Workload::AesCtrStream => "AES CTR Stream",
            Workload::ReadSamples => "Read Samples",
            Workload::ReadSamplesDcfCbc => "Read Samples DCF CBC",
            Workload::ReadSamplesDcfCtr => "Read Samples DCF CTR",
            Workload::ReadSamplesPdcfCbc => "Read Samples PDCF CBC",
            Workload::ReadSamplesPdcfCtr => "Read Samples PDCF CTR",
        }
    }

    pub const fn is_cipher(self) -> bool {
        matches!(
            self,
            Workload::AesBlockEncrypt
                | Workload::AesBlockDecrypt
                | Workload::AesCbcStreamEncrypt
                | Workload::AesCbcStreamDecrypt
                | Workload::AesCtrStream
        )
    }
}

impl FromStr for Workload {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Workload::ALL
            .into_iter()
            .find(|w| w.name() == s)
            .ok_or_else(|| BenchError::UnknownWorkload(s.to_owned()))
    }
}

/// Enabled workloads, one flag per [`Workload`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkloadSelection {
    enabled: [bool; 10],
}

impl WorkloadSelection {
    pub fn all() -> Self {
        Self {
            enabled: [true; 10],
        }
    }

    /// Parse positional names. `all` enables everything; any unknown name
    /// fails the whole selection.
    pub fn parse<I, S>(names: I) -> Result<Self, BenchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::default();
        for name in names {
            match name.as_ref() {
                "all" => selection = Self::all(),
                other => selection.enable(other.parse()?),
            }
        }
        Ok(selection)
    }

    pub fn enable(&mut self, workload: Workload) {
        self.enabled[workload as usize] = true;
    }

    pub fn is_enabled(&self, workload: Workload) -> bool {
        self.enabled[workload as usize]
    }

    pub fn is_empty(&self) -> bool {
        !self.enabled.contains(&true)
    }

    /// Enabled workloads in execution order.
    pub fn iter(&self) -> impl Iterator<Item = Workload> + '_ {
        Workload::ALL.into_iter().filter(|w| self.is_enabled(*w))
    }
}

/// Input files of the five sample workloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestFiles {
    pub mp4: PathBuf,
    pub dcf_cbc: PathBuf,
    pub dcf_ctr: PathBuf,
    pub pdcf_cbc: PathBuf,
    pub pdcf_ctr: PathBuf,
}

impl Default for TestFiles {
    fn default() -> Self {
        Self::in_dir(Path::new(""))
    }
}

impl TestFiles {
    /// The default file names, inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            mp4: dir.join(DEFAULT_TEST_FILE_MP4),
            dcf_cbc: dir.join(DEFAULT_TEST_FILE_DCF_CBC),
            dcf_ctr: dir.join(DEFAULT_TEST_FILE_DCF_CTR),
            pdcf_cbc: dir.join(DEFAULT_TEST_FILE_PDCF_CBC),
            pdcf_ctr: dir.join(DEFAULT_TEST_FILE_PDCF_CTR),
        }
    }

    /// Input of a sample workload; `None` for cipher workloads.
    pub fn path_for(&self, workload: Workload) -> Option<&Path> {
        let path = match workload {
            Workload::ReadSamples => &self.mp4,
            Workload::ReadSamplesDcfCbc => &self.dcf_cbc,
            Workload::ReadSamplesDcfCtr => &self.dcf_ctr,
            Workload::ReadSamplesPdcfCbc => &self.pdcf_cbc,
            Workload::ReadSamplesPdcfCtr => &self.pdcf_ctr,
            _ => return None,
        };
        Some(path)
    }
}
