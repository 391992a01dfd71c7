use actix_cors::Cors;

pub fn create_cors() -> Cors {
    Cors::default()
        .allowed_origin_fn(|_, _req_head| {
            // 生产环境应限制为站点域名
            true
        })
        .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
        // 放宽Header限制，避免前端自定义Header导致预检失败
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}
