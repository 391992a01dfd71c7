use crate::client::gateway::CommissionGateway;
use crate::error::{AppError, AppResult};
use crate::models::{ContactChannel, CreateOrderRequest, ShippingAddress};
use crate::utils::{is_valid_email, is_valid_phone};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use std::collections::HashMap;

/// 单张参考图上限 5MB
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
/// 最多3张参考图
pub const MAX_IMAGES: usize = 3;

const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// 表单的三个页面，依次填写
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPage {
    Contact,
    Artwork,
    Final,
}

impl FormPage {
    pub fn step(&self) -> usize {
        match self {
            FormPage::Contact => 0,
            FormPage::Artwork => 1,
            FormPage::Final => 2,
        }
    }

    fn next(&self) -> Option<FormPage> {
        match self {
            FormPage::Contact => Some(FormPage::Artwork),
            FormPage::Artwork => Some(FormPage::Final),
            FormPage::Final => None,
        }
    }

    fn prev(&self) -> Option<FormPage> {
        match self {
            FormPage::Contact => None,
            FormPage::Artwork => Some(FormPage::Contact),
            FormPage::Final => Some(FormPage::Artwork),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Submitting,
    Submitted,
    Failed(String),
}

/// 字段更新命令：用tagged union替代前端的动态change事件，
/// 保证对已知字段集的穷尽匹配
#[derive(Debug, Clone)]
pub enum FieldUpdate {
    FullName(String),
    Email(String),
    Phone(String),
    PreferredCommunication(ContactChannel),
    ArtworkType(String),
    Medium(String),
    Size(String),
    ColorPalette(String),
    Purpose(String),
    AddressLine1(String),
    AddressLine2(String),
    City(String),
    State(String),
    PostalCode(String),
    Country(String),
    AdditionalNotes(String),
    Newsletter(bool),
}

#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub preferred_communication: ContactChannel,
    pub artwork_type: String,
    pub medium: String,
    pub size: String,
    pub color_palette: String,
    pub purpose: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub additional_notes: String,
    pub newsletter: bool,
}

/// 已接受的参考图，附带立即生成的data URI编码
#[derive(Debug, Clone)]
pub struct AttachedImage {
    pub file_name: String,
    pub content_type: String,
    pub encoded: String,
}

/// 三页下单表单的状态机。
/// 页面推进由逐页校验把关；图片校验是字段级错误，不阻塞翻页。
pub struct IntakeForm {
    page: FormPage,
    phase: FormPhase,
    draft: OrderDraft,
    images: Vec<AttachedImage>,
    errors: HashMap<&'static str, String>,
}

impl Default for IntakeForm {
    fn default() -> Self {
        Self::new()
    }
}

impl IntakeForm {
    pub fn new() -> Self {
        Self {
            page: FormPage::Contact,
            phase: FormPhase::Editing,
            draft: OrderDraft::default(),
            images: Vec::new(),
            errors: HashMap::new(),
        }
    }

    pub fn page(&self) -> FormPage {
        self.page
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    pub fn images(&self) -> &[AttachedImage] {
        &self.images
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(|s| s.as_str())
    }

    pub fn errors(&self) -> &HashMap<&'static str, String> {
        &self.errors
    }

    /// 应用一条字段更新命令，并清除该字段已有的错误
    pub fn apply(&mut self, update: FieldUpdate) {
        let cleared = match update {
            FieldUpdate::FullName(value) => {
                self.draft.full_name = value;
                "fullName"
            }
            FieldUpdate::Email(value) => {
                self.draft.email = value;
                "email"
            }
            FieldUpdate::Phone(value) => {
                self.draft.phone = value;
                "phone"
            }
            FieldUpdate::PreferredCommunication(value) => {
                self.draft.preferred_communication = value;
                "preferredCommunication"
            }
            FieldUpdate::ArtworkType(value) => {
                self.draft.artwork_type = value;
                "artworkType"
            }
            FieldUpdate::Medium(value) => {
                self.draft.medium = value;
                "medium"
            }
            FieldUpdate::Size(value) => {
                self.draft.size = value;
                "size"
            }
            FieldUpdate::ColorPalette(value) => {
                self.draft.color_palette = value;
                "colorPalette"
            }
            FieldUpdate::Purpose(value) => {
                self.draft.purpose = value;
                "purpose"
            }
            FieldUpdate::AddressLine1(value) => {
                self.draft.address_line1 = value;
                "addressLine1"
            }
            FieldUpdate::AddressLine2(value) => {
                self.draft.address_line2 = value;
                "addressLine2"
            }
            FieldUpdate::City(value) => {
                self.draft.city = value;
                "city"
            }
            FieldUpdate::State(value) => {
                self.draft.state = value;
                "state"
            }
            FieldUpdate::PostalCode(value) => {
                self.draft.postal_code = value;
                "postalCode"
            }
            FieldUpdate::Country(value) => {
                self.draft.country = value;
                "country"
            }
            FieldUpdate::AdditionalNotes(value) => {
                self.draft.additional_notes = value;
                "additionalNotes"
            }
            FieldUpdate::Newsletter(value) => {
                self.draft.newsletter = value;
                "newsletter"
            }
        };

        self.errors.remove(cleared);
    }

    /// 附加一张参考图：超限或类型不符时记录字段级错误并拒绝，
    /// 接受的图片立即编码为data URI
    pub fn attach_image(&mut self, file_name: &str, content_type: &str, bytes: &[u8]) -> bool {
        if self.images.len() >= MAX_IMAGES {
            self.errors.insert(
                "images",
                format!("You can upload at most {} images", MAX_IMAGES),
            );
            return false;
        }

        if !ALLOWED_IMAGE_TYPES.contains(&content_type) {
            self.errors.insert(
                "images",
                "Only JPEG, PNG, GIF and WebP images are allowed".to_string(),
            );
            return false;
        }

        if bytes.len() > MAX_IMAGE_BYTES {
            self.errors
                .insert("images", "Images must be 5MB or smaller".to_string());
            return false;
        }

        self.errors.remove("images");
        self.images.push(AttachedImage {
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            encoded: format!("data:{};base64,{}", content_type, BASE64.encode(bytes)),
        });

        true
    }

    /// 移除参考图，编码列表随文件列表同步
    pub fn remove_image(&mut self, index: usize) {
        if index < self.images.len() {
            self.images.remove(index);
            self.errors.remove("images");
        }
    }

    /// 校验通过才会推进到下一页；失败时停在当前页并记录字段错误
    pub fn next_page(&mut self) -> bool {
        let errors = self.validate_page(self.page);
        if !errors.is_empty() {
            self.errors.extend(errors);
            return false;
        }

        match self.page.next() {
            Some(next) => {
                self.page = next;
                true
            }
            None => false,
        }
    }

    /// 返回上一页不做校验
    pub fn prev_page(&mut self) {
        if let Some(prev) = self.page.prev() {
            self.page = prev;
        }
    }

    fn validate_page(&self, page: FormPage) -> HashMap<&'static str, String> {
        let mut errors = HashMap::new();
        let draft = &self.draft;

        match page {
            FormPage::Contact => {
                if draft.full_name.trim().is_empty() {
                    errors.insert("fullName", "Full name is required".to_string());
                }
                if draft.email.trim().is_empty() {
                    errors.insert("email", "Email is required".to_string());
                } else if !is_valid_email(draft.email.trim()) {
                    errors.insert("email", "Enter a valid email address".to_string());
                }
                if !draft.phone.trim().is_empty() && !is_valid_phone(draft.phone.trim()) {
                    errors.insert("phone", "Enter a valid phone number".to_string());
                }
            }
            FormPage::Artwork => {
                if draft.artwork_type.is_empty() {
                    errors.insert("artworkType", "Select an artwork type".to_string());
                }
                if draft.medium.is_empty() {
                    errors.insert("medium", "Select a medium".to_string());
                }
                if draft.size.is_empty() {
                    errors.insert("size", "Select a size".to_string());
                }
            }
            FormPage::Final => {
                if draft.purpose.is_empty() {
                    errors.insert("purpose", "Select a purpose".to_string());
                }
                if draft.address_line1.trim().is_empty() {
                    errors.insert("addressLine1", "Address line 1 is required".to_string());
                }
                if draft.city.trim().is_empty() {
                    errors.insert("city", "City is required".to_string());
                }
                if draft.state.trim().is_empty() {
                    errors.insert("state", "State is required".to_string());
                }
                if draft.postal_code.trim().is_empty() {
                    errors.insert("postalCode", "Postal code is required".to_string());
                }
                if draft.country.is_empty() {
                    errors.insert("country", "Select a country".to_string());
                }
            }
        }

        errors
    }

    /// 提交：只允许在末页且末页校验通过时调用。
    /// 图片上传是可选步骤，失败记录日志后继续无图下单；
    /// 下单失败进入 Failed，可 dismiss 后原页重试。
    pub async fn submit(&mut self, gateway: &dyn CommissionGateway) -> AppResult<i64> {
        if self.page != FormPage::Final {
            return Err(AppError::ValidationError(
                "Submission is only allowed from the final page".to_string(),
            ));
        }

        let errors = self.validate_page(FormPage::Final);
        if !errors.is_empty() {
            self.errors.extend(errors);
            return Err(AppError::ValidationError(
                "Please correct the highlighted fields".to_string(),
            ));
        }

        self.phase = FormPhase::Submitting;

        let image_urls = if self.images.is_empty() {
            Vec::new()
        } else {
            let encoded: Vec<String> =
                self.images.iter().map(|image| image.encoded.clone()).collect();
            match gateway.upload_images(&encoded).await {
                Ok(urls) => urls,
                Err(e) => {
                    log::warn!("Image upload failed, submitting order without images: {e}");
                    Vec::new()
                }
            }
        };

        let request = self.build_request(image_urls);

        match gateway.submit_order(&request).await {
            Ok(order_id) => {
                self.phase = FormPhase::Submitted;
                Ok(order_id)
            }
            Err(e) => {
                self.phase = FormPhase::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// 关闭错误提示，回到编辑状态（停留在当前页）
    pub fn dismiss_error(&mut self) {
        if matches!(self.phase, FormPhase::Failed(_)) {
            self.phase = FormPhase::Editing;
        }
    }

    fn build_request(&self, image_urls: Vec<String>) -> CreateOrderRequest {
        let draft = &self.draft;

        fn optional(value: &str) -> Option<String> {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }

        CreateOrderRequest {
            full_name: draft.full_name.trim().to_string(),
            email: draft.email.trim().to_string(),
            phone: optional(&draft.phone),
            preferred_communication: draft.preferred_communication,
            artwork_type: draft.artwork_type.clone(),
            medium: draft.medium.clone(),
            size: draft.size.clone(),
            color_palette: optional(&draft.color_palette),
            image_urls,
            purpose: draft.purpose.clone(),
            shipping_address: ShippingAddress {
                address_line1: draft.address_line1.trim().to_string(),
                address_line2: optional(&draft.address_line2),
                city: draft.city.trim().to_string(),
                state: draft.state.trim().to_string(),
                postal_code: draft.postal_code.trim().to_string(),
                country: draft.country.clone(),
            },
            additional_notes: optional(&draft.additional_notes),
            newsletter: draft.newsletter,
            order_date: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderResponse, OrderStatus};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockGateway {
        fail_upload: bool,
        fail_order: bool,
        submitted: Mutex<Vec<CreateOrderRequest>>,
    }

    #[async_trait]
    impl CommissionGateway for MockGateway {
        async fn upload_images(&self, images: &[String]) -> crate::error::AppResult<Vec<String>> {
            if self.fail_upload {
                return Err(AppError::ExternalApiError("upload failed".to_string()));
            }
            Ok(images
                .iter()
                .enumerate()
                .map(|(i, _)| format!("https://cdn.example.com/image-{i}.jpg"))
                .collect())
        }

        async fn submit_order(&self, order: &CreateOrderRequest) -> crate::error::AppResult<i64> {
            if self.fail_order {
                return Err(AppError::ExternalApiError("order create failed".to_string()));
            }
            self.submitted.lock().unwrap().push(order.clone());
            Ok(42)
        }

        async fn fetch_orders(&self) -> crate::error::AppResult<Vec<OrderResponse>> {
            Ok(Vec::new())
        }

        async fn update_status(
            &self,
            _order_id: i64,
            _status: OrderStatus,
        ) -> crate::error::AppResult<OrderResponse> {
            Err(AppError::NotFound("Order not found".to_string()))
        }
    }

    fn fill_contact(form: &mut IntakeForm) {
        form.apply(FieldUpdate::FullName("Jane Doe".to_string()));
        form.apply(FieldUpdate::Email("jane@x.com".to_string()));
    }

    fn fill_artwork(form: &mut IntakeForm) {
        form.apply(FieldUpdate::ArtworkType("painting".to_string()));
        form.apply(FieldUpdate::Medium("oil".to_string()));
        form.apply(FieldUpdate::Size("medium".to_string()));
    }

    fn fill_final(form: &mut IntakeForm) {
        form.apply(FieldUpdate::Purpose("gift".to_string()));
        form.apply(FieldUpdate::AddressLine1("1 Main St".to_string()));
        form.apply(FieldUpdate::City("Lagos".to_string()));
        form.apply(FieldUpdate::State("Lagos".to_string()));
        form.apply(FieldUpdate::PostalCode("100001".to_string()));
        form.apply(FieldUpdate::Country("Nigeria".to_string()));
    }

    fn filled_form() -> IntakeForm {
        let mut form = IntakeForm::new();
        fill_contact(&mut form);
        assert!(form.next_page());
        fill_artwork(&mut form);
        assert!(form.next_page());
        fill_final(&mut form);
        form
    }

    #[test]
    fn test_empty_contact_page_blocks_advancement() {
        let mut form = IntakeForm::new();

        assert!(!form.next_page());
        assert_eq!(form.page(), FormPage::Contact);
        assert!(!form.field_error("fullName").unwrap().is_empty());
        assert!(!form.field_error("email").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_email_blocks_advancement() {
        let mut form = IntakeForm::new();
        form.apply(FieldUpdate::FullName("Jane Doe".to_string()));
        form.apply(FieldUpdate::Email("not-an-email".to_string()));

        assert!(!form.next_page());
        assert_eq!(form.page(), FormPage::Contact);
        assert!(form.field_error("email").is_some());

        // 修正后错误被清除并可以翻页
        form.apply(FieldUpdate::Email("jane@x.com".to_string()));
        assert!(form.field_error("email").is_none());
        assert!(form.next_page());
        assert_eq!(form.page(), FormPage::Artwork);
    }

    #[test]
    fn test_invalid_phone_blocks_but_empty_phone_allowed() {
        let mut form = IntakeForm::new();
        fill_contact(&mut form);
        form.apply(FieldUpdate::Phone("call me maybe".to_string()));

        assert!(!form.next_page());
        assert!(form.field_error("phone").is_some());

        form.apply(FieldUpdate::Phone(String::new()));
        assert!(form.next_page());
    }

    #[test]
    fn test_artwork_page_requires_selections() {
        let mut form = IntakeForm::new();
        fill_contact(&mut form);
        assert!(form.next_page());

        assert!(!form.next_page());
        assert_eq!(form.page(), FormPage::Artwork);
        assert!(form.field_error("artworkType").is_some());
        assert!(form.field_error("medium").is_some());
        assert!(form.field_error("size").is_some());
    }

    #[test]
    fn test_final_page_requires_shipping_fields() {
        let mut form = IntakeForm::new();
        fill_contact(&mut form);
        assert!(form.next_page());
        fill_artwork(&mut form);
        assert!(form.next_page());

        assert!(!form.next_page());
        for field in ["purpose", "addressLine1", "city", "state", "postalCode", "country"] {
            assert!(form.field_error(field).is_some(), "missing error for {field}");
        }
    }

    #[test]
    fn test_prev_page_never_validates() {
        let mut form = IntakeForm::new();
        fill_contact(&mut form);
        assert!(form.next_page());

        form.prev_page();
        assert_eq!(form.page(), FormPage::Contact);
    }

    #[test]
    fn test_attach_image_rejects_oversize() {
        let mut form = IntakeForm::new();
        let too_big = vec![0u8; MAX_IMAGE_BYTES + 1];

        assert!(!form.attach_image("big.png", "image/png", &too_big));
        assert!(form.images().is_empty());
        assert!(form.field_error("images").is_some());
    }

    #[test]
    fn test_attach_image_rejects_unsupported_type() {
        let mut form = IntakeForm::new();

        assert!(!form.attach_image("notes.pdf", "application/pdf", b"%PDF-1.4"));
        assert!(form.images().is_empty());
        assert!(form.field_error("images").is_some());
    }

    #[test]
    fn test_attach_image_caps_at_three() {
        let mut form = IntakeForm::new();

        for i in 0..MAX_IMAGES {
            assert!(form.attach_image(&format!("ref-{i}.png"), "image/png", b"fake-bytes"));
        }
        assert!(!form.attach_image("ref-3.png", "image/png", b"fake-bytes"));
        assert_eq!(form.images().len(), MAX_IMAGES);
    }

    #[test]
    fn test_attach_image_encodes_data_uri() {
        let mut form = IntakeForm::new();

        assert!(form.attach_image("ref.png", "image/png", b"fake-bytes"));
        assert!(form.images()[0].encoded.starts_with("data:image/png;base64,"));

        // 图片校验错误不阻塞翻页
        assert!(!form.attach_image("notes.pdf", "application/pdf", b"%PDF-1.4"));
        fill_contact(&mut form);
        assert!(form.next_page());
    }

    #[test]
    fn test_remove_image_keeps_lists_in_sync() {
        let mut form = IntakeForm::new();
        form.attach_image("a.png", "image/png", b"a");
        form.attach_image("b.png", "image/png", b"b");

        form.remove_image(0);
        assert_eq!(form.images().len(), 1);
        assert_eq!(form.images()[0].file_name, "b.png");
    }

    #[tokio::test]
    async fn test_submit_without_images() {
        let mut form = filled_form();
        let gateway = MockGateway::default();

        let order_id = form.submit(&gateway).await.unwrap();
        assert_eq!(order_id, 42);
        assert_eq!(*form.phase(), FormPhase::Submitted);

        let submitted = gateway.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].full_name, "Jane Doe");
        assert_eq!(submitted[0].email, "jane@x.com");
        assert!(submitted[0].image_urls.is_empty());
        assert!(submitted[0].phone.is_none());
    }

    #[tokio::test]
    async fn test_submit_uploads_images_first() {
        let mut form = filled_form();
        form.attach_image("ref.png", "image/png", b"fake-bytes");
        let gateway = MockGateway::default();

        form.submit(&gateway).await.unwrap();

        let submitted = gateway.submitted.lock().unwrap();
        assert_eq!(
            submitted[0].image_urls,
            vec!["https://cdn.example.com/image-0.jpg"]
        );
    }

    #[tokio::test]
    async fn test_upload_failure_does_not_block_submission() {
        let mut form = filled_form();
        form.attach_image("ref.png", "image/png", b"fake-bytes");
        let gateway = MockGateway {
            fail_upload: true,
            ..Default::default()
        };

        let order_id = form.submit(&gateway).await.unwrap();
        assert_eq!(order_id, 42);
        assert_eq!(*form.phase(), FormPhase::Submitted);

        let submitted = gateway.submitted.lock().unwrap();
        assert!(submitted[0].image_urls.is_empty());
    }

    #[tokio::test]
    async fn test_order_failure_transitions_to_failed() {
        let mut form = filled_form();
        let gateway = MockGateway {
            fail_order: true,
            ..Default::default()
        };

        assert!(form.submit(&gateway).await.is_err());
        assert!(matches!(form.phase(), FormPhase::Failed(_)));
        assert_eq!(form.page(), FormPage::Final);

        // 关闭错误提示后回到编辑状态，可原页重试
        form.dismiss_error();
        assert_eq!(*form.phase(), FormPhase::Editing);

        let retry_gateway = MockGateway::default();
        assert!(form.submit(&retry_gateway).await.is_ok());
    }

    #[tokio::test]
    async fn test_submit_rejected_before_final_page() {
        let mut form = IntakeForm::new();
        fill_contact(&mut form);
        let gateway = MockGateway::default();

        assert!(form.submit(&gateway).await.is_err());
        assert_eq!(*form.phase(), FormPhase::Editing);
        assert!(gateway.submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_validates_final_page() {
        let mut form = IntakeForm::new();
        fill_contact(&mut form);
        assert!(form.next_page());
        fill_artwork(&mut form);
        assert!(form.next_page());
        // 末页未填
        let gateway = MockGateway::default();

        assert!(form.submit(&gateway).await.is_err());
        assert!(form.field_error("purpose").is_some());
        assert!(gateway.submitted.lock().unwrap().is_empty());
    }
}
