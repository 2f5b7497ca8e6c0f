//! The "file name or already-decomposed" acceptance pattern used by
//! `SearchDriver::find_best` and `DownloadPipeline::download_and_extract`.

use animesub_parse::DecomposedFileName;

#[derive(Debug, Clone)]
pub enum FileOrDecomposed {
    FileName(String),
    Decomposed(DecomposedFileName),
}

impl FileOrDecomposed {
    pub fn into_decomposed(self) -> DecomposedFileName {
        match self {
            FileOrDecomposed::FileName(name) => animesub_parse::parse(&name),
            FileOrDecomposed::Decomposed(d) => d,
        }
    }
}

impl From<&str> for FileOrDecomposed {
    fn from(s: &str) -> Self {
        FileOrDecomposed::FileName(s.to_string())
    }
}

impl From<String> for FileOrDecomposed {
    fn from(s: String) -> Self {
        FileOrDecomposed::FileName(s)
    }
}

impl From<DecomposedFileName> for FileOrDecomposed {
    fn from(d: DecomposedFileName) -> Self {
        FileOrDecomposed::Decomposed(d)
    }
}
