use serde::{Deserialize, Serialize};

use crate::utils::format_bytes;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct GalleryImage {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(alias = "imageUrl", alias = "url")]
    pub image_url: String,
    #[serde(alias = "categoryId", default)]
    pub category_id: Option<i64>,
    #[serde(alias = "uploadedBy", default)]
    pub uploaded_by: Option<String>,
    #[serde(alias = "fileSize", default)]
    pub file_size: Option<u64>,
    #[serde(alias = "createdAt", default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct GalleryCategory {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(alias = "imageCount", default)]
    pub image_count: Option<u64>,
}

/// Object-storage usage for the gallery bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct GalleryStats {
    #[serde(alias = "totalImages", default)]
    pub total_images: u64,
    #[serde(alias = "totalCategories", default)]
    pub total_categories: u64,
    #[serde(alias = "totalSize", alias = "totalSizeBytes", default)]
    pub total_size_bytes: u64,
    #[serde(alias = "storageLimit", alias = "storageLimitBytes", default)]
    pub storage_limit_bytes: Option<u64>,
}

impl GalleryStats {
    pub fn usage_percent(&self) -> Option<f64> {
        match self.storage_limit_bytes {
            Some(limit) if limit > 0 => Some(self.total_size_bytes as f64 * 100.0 / limit as f64),
            _ => None,
        }
    }

    pub fn usage_display(&self) -> String {
        match (self.storage_limit_bytes, self.usage_percent()) {
            (Some(limit), Some(pct)) => format!(
                "{} of {} ({:.1}%)",
                format_bytes(self.total_size_bytes),
                format_bytes(limit),
                pct
            ),
            _ => format_bytes(self.total_size_bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gallery_image_accepts_url_alias() {
        let image: GalleryImage =
            serde_json::from_str(r#"{"id": 4, "url": "https://cdn/a.jpg", "categoryId": 2}"#).unwrap();
        assert_eq!(image.image_url, "https://cdn/a.jpg");
        assert_eq!(image.category_id, Some(2));
    }

    #[test]
    fn test_usage_display_with_limit() {
        let stats = GalleryStats {
            total_images: 10,
            total_categories: 2,
            total_size_bytes: 512 * 1024 * 1024,
            storage_limit_bytes: Some(1024 * 1024 * 1024),
        };
        assert_eq!(stats.usage_percent(), Some(50.0));
        assert_eq!(stats.usage_display(), "512.0 MB of 1.0 GB (50.0%)");
    }

    #[test]
    fn test_usage_display_without_limit() {
        let stats = GalleryStats {
            total_size_bytes: 2048,
            ..Default::default()
        };
        assert_eq!(stats.usage_percent(), None);
        assert_eq!(stats.usage_display(), "2.0 KB");
    }
}
