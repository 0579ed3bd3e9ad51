//! Ingestion options

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

/// Filename extension substitution for manifests whose filenames still name
/// a format the images were later converted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionRewrite {
    legacy: String,
    target: String,
}

impl ExtensionRewrite {
    pub fn new(legacy: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            legacy: legacy.into(),
            target: target.into(),
        }
    }

    pub fn legacy(&self) -> &str {
        &self.legacy
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Replace the first occurrence of the legacy suffix; otherwise pass through.
    pub fn apply<'a>(&self, file_name: &'a str) -> Cow<'a, str> {
        if self.legacy.is_empty() {
            return Cow::Borrowed(file_name);
        }
        if file_name.contains(self.legacy.as_str()) {
            Cow::Owned(file_name.replacen(self.legacy.as_str(), &self.target, 1))
        } else {
            Cow::Borrowed(file_name)
        }
    }
}

impl Default for ExtensionRewrite {
    fn default() -> Self {
        Self::new(".tiff", ".png")
    }
}

/// Options for one ingestion call.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    image_root: PathBuf,
    mask_path: Option<PathBuf>,
    extension_rewrite: Option<ExtensionRewrite>,
}

impl IngestOptions {
    /// Options reading images relative to `image_root`, no rewrite, no mask.
    pub fn new(image_root: impl Into<PathBuf>) -> Self {
        Self {
            image_root: image_root.into(),
            mask_path: None,
            extension_rewrite: None,
        }
    }

    /// Set the mask file. It is carried through but not read during ingestion.
    pub fn with_mask_path(mut self, mask_path: impl Into<PathBuf>) -> Self {
        let mask_path = mask_path.into();
        self.mask_path = (!mask_path.as_os_str().is_empty()).then_some(mask_path);
        self
    }

    /// Enable or disable the default `.tiff` to `.png` rewrite.
    pub fn with_extension_rewrite(mut self, enabled: bool) -> Self {
        self.extension_rewrite = enabled.then(ExtensionRewrite::default);
        self
    }

    /// Enable a custom rewrite rule.
    pub fn with_rewrite_rule(mut self, rule: ExtensionRewrite) -> Self {
        self.extension_rewrite = Some(rule);
        self
    }

    pub fn image_root(&self) -> &Path {
        &self.image_root
    }

    pub fn mask_path(&self) -> Option<&Path> {
        self.mask_path.as_deref()
    }

    pub fn extension_rewrite(&self) -> Option<&ExtensionRewrite> {
        self.extension_rewrite.as_ref()
    }

    /// Manifest filename after the optional rewrite.
    pub fn resolve_name<'a>(&self, file_name: &'a str) -> Cow<'a, str> {
        match &self.extension_rewrite {
            Some(rule) => rule.apply(file_name),
            None => Cow::Borrowed(file_name),
        }
    }

    /// Full path of a resolved filename, always under the image root.
    pub fn image_path(&self, resolved_name: &str) -> PathBuf {
        let mut path = self.image_root.clone();
        path.extend(
            Path::new(resolved_name)
                .components()
                .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_))),
        );
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rewrite() {
        let opts = IngestOptions::new("/data").with_extension_rewrite(true);
        assert_eq!(opts.resolve_name("frame1.tiff"), "frame1.png");
        assert_eq!(opts.resolve_name("frame1.jpg"), "frame1.jpg");
    }

    #[test]
    fn test_rewrite_disabled() {
        let opts = IngestOptions::new("/data");
        assert_eq!(opts.resolve_name("frame1.tiff"), "frame1.tiff");
        assert!(opts.extension_rewrite().is_none());
    }

    #[test]
    fn test_rewrite_first_occurrence_only() {
        let rule = ExtensionRewrite::default();
        assert_eq!(rule.apply("a.tiff.tiff"), "a.png.tiff");
        assert!(matches!(rule.apply("a.bmp"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_custom_rule() {
        let opts = IngestOptions::new("/data").with_rewrite_rule(ExtensionRewrite::new(".raw", ".jpg"));
        assert_eq!(opts.resolve_name("x.raw"), "x.jpg");
    }

    #[test]
    fn test_absolute_name_stays_under_root() {
        let opts = IngestOptions::new("/images");
        let path = opts.image_path("/etc/v0.png");
        assert!(path.starts_with("/images"));
        assert_eq!(path, PathBuf::from("/images/etc/v0.png"));
    }

    #[test]
    fn test_paths() {
        let opts = IngestOptions::new("/data/images").with_mask_path("");
        assert!(opts.mask_path().is_none());
        assert_eq!(opts.image_path("v0.png"), PathBuf::from("/data/images/v0.png"));

        assert_eq!(
            opts.image_path("sub/v1.png"),
            PathBuf::from("/data/images/sub/v1.png")
        );

        let opts = opts.with_mask_path("/data/mask.png");
        assert_eq!(opts.mask_path(), Some(Path::new("/data/mask.png")));
    }
}
