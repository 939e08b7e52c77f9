use std::{
    fs,
    io::Read,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

/// Where the raw, newline-separated participant text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamesSource {
    Arguments(Vec<String>),
    File(PathBuf),
    Stdin,
}

impl NamesSource {
    pub fn from_args(names: &[String], names_file: Option<&Path>) -> Self {
        if !names.is_empty() {
            return Self::Arguments(names.to_vec());
        }
        match names_file {
            Some(path) if path.as_os_str() == "-" => Self::Stdin,
            Some(path) => Self::File(path.to_path_buf()),
            None => Self::Stdin,
        }
    }

    pub fn read_raw(&self, stdin: impl Read) -> Result<String> {
        match self {
            Self::Arguments(names) => Ok(names.join("\n")),
            Self::File(path) => fs::read_to_string(path)
                .with_context(|| format!("failed to read names file '{}'", path.display())),
            Self::Stdin => {
                let mut raw = String::new();
                let mut stdin = stdin;
                stdin
                    .read_to_string(&mut raw)
                    .context("failed to read names from stdin")?;
                Ok(raw)
            }
        }
    }
}
