use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct DataPath {
    base: PathBuf,
}

impl DataPath {
    pub fn new(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref().to_path_buf();
        Self { base }
    }

    pub fn default_base() -> Option<PathBuf> {
        dirs::data_local_dir().map(|pb| pb.join("reeldeck"))
    }

    pub fn default_base_or_cwd() -> PathBuf {
        Self::default_base().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn rel_path(&self, typ: DataPathType) -> PathBuf {
        match typ {
            DataPathType::Log => PathBuf::from("logs"),
            DataPathType::Setting => PathBuf::from("settings"),
        }
    }

    pub fn path(&self, typ: DataPathType) -> PathBuf {
        self.base.join(self.rel_path(typ))
    }
}

impl Default for DataPath {
    fn default() -> Self {
        Self::new(Self::default_base_or_cwd())
    }
}

pub enum DataPathType {
    Log,
    Setting,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Directory {
    pub file_path: PathBuf,
}

impl Directory {
    pub fn new(file_path: PathBuf) -> Self {
        Self { file_path }
    }

    pub fn get_file(&self, file_name: &str) -> Result<String> {
        let filepath = self.file_path.join(file_name);

        if filepath.is_file() {
            Ok(fs::read_to_string(filepath)?)
        } else {
            Err(Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Requested file was not found: {file_name}"),
            )))
        }
    }

    pub fn has_file(&self, file_name: &str) -> bool {
        self.file_path.join(file_name).is_file()
    }
}

/// Write the file to the directory
pub fn write_file(directory: &Path, file_name: &str, data: &str) -> Result<()> {
    if !directory.exists() {
        fs::create_dir_all(directory)?
    }

    fs::write(directory.join(file_name), data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{write_file, DataPath, DataPathType, Directory};

    #[test]
    fn test_write_and_read() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let directory = Directory::new(tmp.path().join("nested"));
        let file_name = "file_test_name.txt";

        assert!(!directory.has_file(file_name));
        assert!(directory.get_file(file_name).is_err());

        write_file(&directory.file_path, file_name, "test").expect("write");
        assert!(directory.has_file(file_name));
        assert_eq!(directory.get_file(file_name).expect("read"), "test");

        write_file(&directory.file_path, file_name, "again").expect("overwrite");
        assert_eq!(directory.get_file(file_name).expect("read"), "again");
    }

    #[test]
    fn test_data_paths() {
        let path = DataPath::new("/tmp/reeldeck-base");
        assert!(path.path(DataPathType::Log).ends_with("logs"));
        assert!(path.path(DataPathType::Setting).ends_with("settings"));
        assert!(path
            .path(DataPathType::Setting)
            .starts_with("/tmp/reeldeck-base"));
    }
}
