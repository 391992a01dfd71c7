use crate::config::CloudinaryConfig;
use crate::error::{AppError, AppResult};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use sha1::{Digest, Sha1};

#[derive(Debug, Deserialize)]
pub struct CloudinaryUploadResponse {
    pub secure_url: String,
}

#[derive(Clone)]
pub struct CloudinaryService {
    client: Client,
    config: CloudinaryConfig,
}

impl CloudinaryService {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// 并发上传全部图片，任意一张失败则整体失败，成功时URL顺序与输入一致
    pub async fn upload_images(&self, images: &[String]) -> AppResult<Vec<String>> {
        let uploads = images.iter().map(|image| self.upload_image(image));
        futures_util::future::try_join_all(uploads).await
    }

    /// 上传单张图片（data URI），返回 secure_url
    pub async fn upload_image(&self, data_uri: &str) -> AppResult<String> {
        let url = format!(
            "{}/v1_1/{}/image/upload",
            self.config.base_url, self.config.cloud_name
        );

        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign(&[("timestamp", timestamp.as_str())]);

        let params = [
            ("file", data_uri),
            ("api_key", self.config.api_key.as_str()),
            ("timestamp", timestamp.as_str()),
            ("signature", signature.as_str()),
        ];

        let response = self.client.post(&url).form(&params).send().await?;

        if response.status().is_success() {
            let result: CloudinaryUploadResponse = response.json().await?;
            Ok(result.secure_url)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::error!("Cloudinary upload failed: {}", error_text);
            Err(AppError::ExternalApiError(format!(
                "Image upload failed: {}",
                error_text
            )))
        }
    }

    /// Cloudinary签名：参数按键排序拼接后追加secret，取SHA-1十六进制
    fn sign(&self, params: &[(&str, &str)]) -> String {
        let mut sorted: Vec<(&str, &str)> = params.to_vec();
        sorted.sort_by_key(|(key, _)| *key);

        let to_sign: String = sorted
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha1::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(self.config.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}
