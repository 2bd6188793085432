//! Persisted model artifacts
//!
//! The vectorizer and the classifier are stored as two separate bincode
//! files. Each file starts with a `u32` format version followed by the
//! payload; loading a file written with a different version fails instead of
//! decoding garbage. Decoding is bounded by the file size, so a corrupt
//! length prefix is reported as a decode error rather than an allocation.

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::classifier::LogisticRegression;
use crate::error::ArtifactError;
use crate::preprocess::NormalizerKind;
use crate::vectorizer::TfidfVectorizer;

pub const FORMAT_VERSION: u32 = 1;

pub const VECTORIZER_FILE: &str = "vectorizer.bin";
pub const CLASSIFIER_FILE: &str = "spam_classifier.bin";

/// Vectorizer together with the text normalizer it was fitted behind
#[derive(Debug, Clone, Deserialize)]
pub struct VectorizerArtifact {
    pub normalizer: NormalizerKind,
    pub vectorizer: TfidfVectorizer,
}

#[derive(Serialize)]
struct VectorizerRecord<'a> {
    normalizer: NormalizerKind,
    vectorizer: &'a TfidfVectorizer,
}

/// Default artifact locations inside an output directory
pub fn artifact_paths(dir: &Path) -> (PathBuf, PathBuf) {
    (dir.join(VECTORIZER_FILE), dir.join(CLASSIFIER_FILE))
}

pub fn save_vectorizer(
    path: &Path,
    vectorizer: &TfidfVectorizer,
    normalizer: NormalizerKind,
) -> Result<(), ArtifactError> {
    write_artifact(
        path,
        &VectorizerRecord {
            normalizer,
            vectorizer,
        },
    )?;
    info!(
        path = %path.display(),
        vocabulary_size = vectorizer.num_features(),
        %normalizer,
        "Vectorizer saved"
    );
    Ok(())
}

pub fn load_vectorizer(path: &Path) -> Result<VectorizerArtifact, ArtifactError> {
    let artifact: VectorizerArtifact = read_artifact(path)?;
    artifact
        .vectorizer
        .vocabulary()
        .validate()
        .map_err(|source| ArtifactError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
    info!(
        path = %path.display(),
        vocabulary_size = artifact.vectorizer.num_features(),
        normalizer = %artifact.normalizer,
        "Vectorizer loaded"
    );
    Ok(artifact)
}

pub fn save_classifier(path: &Path, model: &LogisticRegression) -> Result<(), ArtifactError> {
    write_artifact(path, model)?;
    info!(path = %path.display(), num_features = model.num_features(), "Classifier saved");
    Ok(())
}

pub fn load_classifier(path: &Path) -> Result<LogisticRegression, ArtifactError> {
    let model: LogisticRegression = read_artifact(path)?;
    info!(path = %path.display(), num_features = model.num_features(), "Classifier loaded");
    Ok(model)
}

/// Write to a sibling temp file then rename, so a crash never leaves a
/// truncated artifact under the final name.
fn write_artifact<T: Serialize + ?Sized>(path: &Path, payload: &T) -> Result<(), ArtifactError> {
    let io_err = |source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let file = File::create(&tmp).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, &FORMAT_VERSION).map_err(ArtifactError::Encode)?;
    bincode::serialize_into(&mut writer, payload).map_err(ArtifactError::Encode)?;
    writer.flush().map_err(io_err)?;
    drop(writer);

    fs::rename(&tmp, path).map_err(io_err)?;
    debug!(path = %path.display(), "Artifact written");
    Ok(())
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let file = File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::NotFound(path.to_path_buf())
        } else {
            ArtifactError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let size = file
        .metadata()
        .map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .len();
    let mut reader = BufReader::new(file);

    // Same layout as `bincode::serialize_into`, capped at the file size
    let options = bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
        .with_limit(size);

    let decode_err = |source| ArtifactError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let version: u32 = options.deserialize_from(&mut reader).map_err(decode_err)?;
    if version != FORMAT_VERSION {
        return Err(ArtifactError::Version {
            path: path.to_path_buf(),
            found: version,
            expected: FORMAT_VERSION,
        });
    }

    options.deserialize_from(&mut reader).map_err(decode_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::VectorizerParams;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn fitted_vectorizer() -> TfidfVectorizer {
        let params = VectorizerParams {
            min_df: 1.0,
            max_df: 1.0,
            ..Default::default()
        };
        TfidfVectorizer::fit(&["win cash prize", "lunch tomorrow", "win lunch"], params).unwrap()
    }

    #[test]
    fn test_vectorizer_roundtrip() {
        let dir = TempDir::new().unwrap();
        let (path, _) = artifact_paths(dir.path());
        let vectorizer = fitted_vectorizer();

        save_vectorizer(&path, &vectorizer, NormalizerKind::Stem).unwrap();
        let loaded = load_vectorizer(&path).unwrap();

        assert_eq!(loaded.normalizer, NormalizerKind::Stem);
        assert_eq!(loaded.vectorizer.vocabulary(), vectorizer.vocabulary());
        assert_eq!(
            loaded.vectorizer.transform("win cash tomorrow"),
            vectorizer.transform("win cash tomorrow")
        );
    }

    #[test]
    fn test_classifier_roundtrip_is_bit_exact() {
        let dir = TempDir::new().unwrap();
        let (_, path) = artifact_paths(dir.path());
        let model = LogisticRegression::from_parts(vec![0.1, -2.5e-300, 1.0 / 3.0], -0.7);

        save_classifier(&path, &model).unwrap();
        let loaded = load_classifier(&path).unwrap();

        assert_eq!(loaded, model);
        assert_eq!(loaded.intercept().to_bits(), model.intercept().to_bits());
        assert!(!dir.path().join("spam_classifier.bin.tmp").exists());
    }

    #[test]
    fn test_missing_artifact() {
        let dir = TempDir::new().unwrap();
        let err = load_classifier(&dir.path().join("absent.bin")).unwrap_err();
        assert!(matches!(err, ArtifactError::NotFound(_)));
    }

    #[test]
    fn test_version_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("old.bin");
        let bytes = bincode::serialize(&(FORMAT_VERSION + 1, vec![1.0f64], 0.0f64)).unwrap();
        fs::write(&path, bytes).unwrap();

        let err = load_classifier(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::Version { found, .. } if found == FORMAT_VERSION + 1));
    }

    #[test]
    fn test_corrupt_artifact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corrupt.bin");
        fs::write(&path, [1u8, 0, 0, 0, 0xff]).unwrap();

        let err = load_vectorizer(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::Decode { .. }));
    }

    #[test]
    fn test_oversized_length_prefix() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(VECTORIZER_FILE);
        // One vocabulary entry whose term claims to be 1 TiB long
        let bytes = bincode::serialize(&(
            FORMAT_VERSION,
            NormalizerKind::Lemma,
            VectorizerParams::default(),
            1u64,
            1u64 << 40,
        ))
        .unwrap();
        fs::write(&path, bytes).unwrap();

        let err = load_vectorizer(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::Decode { .. }));
    }

    #[test]
    fn test_inconsistent_vocabulary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(VECTORIZER_FILE);
        // Decodes as a vectorizer whose only term points past the idf table
        let index = HashMap::from([("cash".to_string(), 7usize)]);
        let idf = vec![1.0f64];
        write_artifact(
            &path,
            &(NormalizerKind::Lemma, (VectorizerParams::default(), (index, idf))),
        )
        .unwrap();

        let err = load_vectorizer(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid { .. }));
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/model").join(CLASSIFIER_FILE);
        save_classifier(&path, &LogisticRegression::from_parts(vec![1.0], 0.0)).unwrap();
        assert!(path.exists());
    }
}
