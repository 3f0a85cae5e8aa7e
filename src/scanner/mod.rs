mod category;

pub use category::WardrobeCategory;

use crate::error::{StyleError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
    pub category: Option<WardrobeCategory>,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// ワードローブフォルダをスキャン
///
/// 直下の画像はカテゴリなし、`shirts/` などのサブフォルダ内の画像は
/// フォルダ名からカテゴリを判定する。
pub fn scan_wardrobe(folder: &Path) -> Result<Vec<ImageInfo>> {
    if !folder.exists() {
        return Err(StyleError::FolderNotFound(folder.display().to_string()));
    }

    let mut images = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(2)  // カテゴリフォルダまで
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() || !is_image_extension(path) {
            continue;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let category = if entry.depth() == 2 {
            path.parent()
                .and_then(|p| p.file_name())
                .and_then(|n| WardrobeCategory::from_dir_name(&n.to_string_lossy()))
        } else {
            None
        };

        images.push(ImageInfo {
            path: path.to_path_buf(),
            file_name,
            category,
        });
    }

    // カテゴリ → ファイル名でソート
    images.sort_by(|a, b| (a.category, &a.file_name).cmp(&(b.category, &b.file_name)));

    Ok(images)
}

fn is_image_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// カテゴリ別の画像一覧
#[derive(Debug, Clone, Default)]
pub struct Wardrobe {
    groups: BTreeMap<WardrobeCategory, Vec<ImageInfo>>,
}

impl Wardrobe {
    pub fn from_images(images: &[ImageInfo]) -> Self {
        let mut groups: BTreeMap<WardrobeCategory, Vec<ImageInfo>> = BTreeMap::new();
        for img in images {
            if let Some(category) = img.category {
                groups.entry(category).or_default().push(img.clone());
            }
        }
        Self { groups }
    }

    pub fn images(&self, category: WardrobeCategory) -> &[ImageInfo] {
        self.groups.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 1枚もないカテゴリ（全身コーデの前提条件）
    pub fn missing_categories(&self) -> Vec<WardrobeCategory> {
        WardrobeCategory::ALL
            .iter()
            .copied()
            .filter(|c| self.images(*c).is_empty())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_categories().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;

    #[test]
    fn test_is_image_extension() {
        assert!(is_image_extension(Path::new("a.jpg")));
        assert!(is_image_extension(Path::new("a.JPG")));
        assert!(is_image_extension(Path::new("a.jpeg")));
        assert!(is_image_extension(Path::new("a.png")));
        assert!(is_image_extension(Path::new("a.webp")));
        assert!(!is_image_extension(Path::new("a.txt")));
        assert!(!is_image_extension(Path::new("a.gif")));
        assert!(!is_image_extension(Path::new("noext")));
    }

    #[test]
    fn test_scan_folder_not_found() {
        let result = scan_wardrobe(Path::new("/nonexistent/folder"));
        assert!(matches!(result, Err(StyleError::FolderNotFound(_))));
    }

    #[test]
    fn test_scan_wardrobe_with_categories() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("shirts")).unwrap();
        fs::create_dir_all(root.join("Pants")).unwrap();
        fs::create_dir_all(root.join("misc")).unwrap();

        File::create(root.join("shirts/b.jpg")).unwrap().write_all(b"dummy").unwrap();
        File::create(root.join("shirts/a.png")).unwrap().write_all(b"dummy").unwrap();
        File::create(root.join("Pants/jeans.JPG")).unwrap().write_all(b"dummy").unwrap();
        File::create(root.join("misc/hat.jpg")).unwrap().write_all(b"dummy").unwrap();
        File::create(root.join("loose.jpg")).unwrap().write_all(b"dummy").unwrap();
        File::create(root.join("shirts/notes.txt")).unwrap().write_all(b"text").unwrap();

        let result = scan_wardrobe(root).unwrap();
        assert_eq!(result.len(), 5);

        // カテゴリなしが先頭、続いてカテゴリ順・ファイル名順
        let names: Vec<&str> = result.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["hat.jpg", "loose.jpg", "a.png", "b.jpg", "jeans.JPG"]);
        assert_eq!(result[2].category, Some(WardrobeCategory::Shirts));
        assert_eq!(result[4].category, Some(WardrobeCategory::Pants));
    }

    #[test]
    fn test_wardrobe_missing_categories() {
        let images = vec![
            ImageInfo {
                path: PathBuf::from("shirts/a.jpg"),
                file_name: "a.jpg".into(),
                category: Some(WardrobeCategory::Shirts),
            },
            ImageInfo {
                path: PathBuf::from("shoes/b.jpg"),
                file_name: "b.jpg".into(),
                category: Some(WardrobeCategory::Shoes),
            },
            ImageInfo {
                path: PathBuf::from("c.jpg"),
                file_name: "c.jpg".into(),
                category: None,
            },
        ];

        let wardrobe = Wardrobe::from_images(&images);
        assert_eq!(wardrobe.images(WardrobeCategory::Shirts).len(), 1);
        assert_eq!(
            wardrobe.missing_categories(),
            vec![WardrobeCategory::Pants, WardrobeCategory::Addons]
        );
        assert!(!wardrobe.is_complete());
    }
}
