//! タグ付けゲートウェイ
//!
//! Visionモデルの呼び出しを包み、応答の修復・パースを行う。
//! 失敗（通信・モデル・パース）はすべて固定タグへのフォールバックとして扱い、
//! 呼び出し元へエラーを返さない。

mod gemini;
mod types;

pub use gemini::{GeminiVision, TAGGING_PROMPT};
pub use types::{
    extract_base64_from_data_url, extract_mime_type_from_data_url, fallback_tags, mime_type_for,
    upload_id, DetectionResponse, ImagePayload, TagResult,
};

use crate::error::Result;
use crate::scanner::{ImageInfo, WardrobeCategory};
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use stylegenie_common::{parse_tag_response, Garment, TagSet};

/// 画像を説明するVisionモデル
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// モデル識別子
    fn name(&self) -> &str;

    /// 画像を送り、モデルの生テキスト応答を返す
    async fn describe(&self, image: &ImagePayload) -> Result<String>;
}

/// 1枚の画像をタグ付け（リトライなし、失敗時はフォールバック）
pub async fn detect<M: VisionModel + ?Sized>(model: &M, image: &ImagePayload) -> TagResult {
    let text = match model.describe(image).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(model = model.name(), error = %e, "タグ付けAPI呼び出し失敗、フォールバックを使用");
            return TagResult::fallback(e.to_string());
        }
    };

    match parse_tag_response(&text) {
        Ok(tags) => TagResult::Detected(tags),
        Err(e) => {
            tracing::warn!(model = model.name(), response = %text, "タグ付け応答のパース失敗、フォールバックを使用");
            TagResult::fallback(e.to_string())
        }
    }
}

/// タグ付け済みの服とその出どころ
#[derive(Debug, Clone)]
pub struct TaggedGarment {
    pub garment: Garment,
    pub category: Option<WardrobeCategory>,
    /// フォールバックになった理由（デモモード表示用）
    pub fallback_reason: Option<String>,
}

impl TaggedGarment {
    pub fn is_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }

    /// 境界のJSON形式へ変換
    pub fn to_response(&self) -> DetectionResponse {
        DetectionResponse {
            tags: TagSet {
                garment_type: self.garment.garment_type.clone(),
                color: self.garment.color.clone(),
                style_tags: self.garment.style_tags.clone(),
            },
            fallback: self.is_fallback(),
            error: self.fallback_reason.clone(),
        }
    }
}

/// 画像リストを順にタグ付けして服に変換
///
/// 服IDはアップロードごとに一意（同じ写真が複数あっても別の服になる）。
/// 画像が読めない場合もフォールバックタグで服を作る。
pub async fn tag_images<M: VisionModel + ?Sized>(
    model: &M,
    images: &[ImageInfo],
    show_progress: bool,
) -> Vec<TaggedGarment> {
    let progress = if show_progress {
        let bar = ProgressBar::new(images.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("  {bar:30} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let mut tagged = Vec::with_capacity(images.len());

    for (slot, img) in images.iter().enumerate() {
        progress.set_message(img.file_name.clone());
        let source = img.path.to_string_lossy();

        let (id, result) = match ImagePayload::from_path(&img.path) {
            Ok(payload) => (
                upload_id(&payload.content_id(), slot, &source),
                detect(model, &payload).await,
            ),
            Err(e) => {
                tracing::warn!(path = %img.path.display(), error = %e, "画像読み込み失敗");
                (upload_id("", slot, &source), TagResult::fallback(e.to_string()))
            }
        };

        let fallback_reason = result.reason().map(str::to_string);
        tagged.push(TaggedGarment {
            garment: Garment::new(id, result.into_tags(), img.path.display().to_string()),
            category: img.category,
            fallback_reason,
        });

        progress.inc(1);
    }

    progress.finish_and_clear();
    tagged
}
