use crate::error::AppError;
use crate::external::CloudinaryService;
use crate::models::UploadRequest;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

/// 上传请求体上限：3张5MB图片base64编码后的余量
const UPLOAD_BODY_LIMIT: usize = 24 * 1024 * 1024;

#[utoipa::path(
    post,
    path = "/uploads",
    tag = "upload",
    request_body = UploadRequest,
    responses(
        (status = 200, description = "全部图片上传成功"),
        (status = 400, description = "未提供图片"),
        (status = 502, description = "上传失败")
    )
)]
pub async fn upload_images(
    cloudinary: web::Data<CloudinaryService>,
    request: web::Json<UploadRequest>,
) -> Result<HttpResponse> {
    let images = &request.images;

    if images.is_empty() {
        return Ok(
            AppError::ValidationError("No images provided".to_string()).error_response()
        );
    }

    log::info!("Attempting to upload {} images to Cloudinary", images.len());

    match cloudinary.upload_images(images).await {
        Ok(image_urls) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "imageUrls": image_urls
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn upload_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/uploads")
            .app_data(web::JsonConfig::default().limit(UPLOAD_BODY_LIMIT))
            .route("", web::post().to(upload_images)),
    );
}
