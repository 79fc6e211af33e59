//! Message catalogue for response envelopes (`en`, `vi`).
//!
//! Keys follow `<module>.message.<kind>.<name>`; a missing key is echoed back
//! unchanged so a typo shows up in the response instead of an empty string.

use std::collections::HashMap;

use once_cell::sync::Lazy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
    Vi,
}

impl Locale {
    pub fn parse(tag: &str) -> Option<Self> {
        let primary = tag.trim().split(['-', '_']).next().unwrap_or("").to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(Self::En),
            "vi" => Some(Self::Vi),
            _ => None,
        }
    }

    /// First supported language of an `Accept-Language` header, ignoring q-weights order.
    pub fn from_accept_language(header: Option<&str>, fallback: Locale) -> Self {
        header
            .into_iter()
            .flat_map(|h| h.split(','))
            .filter_map(|part| Locale::parse(part.split(';').next().unwrap_or("")))
            .next()
            .unwrap_or(fallback)
    }
}

pub mod keys {
    pub const SUCCESS: &str = "common.message.success";
    pub const DELETED: &str = "common.message.deleted";
    pub const INTERNAL: &str = "common.message.error.internal";
    pub const VALIDATION: &str = "common.message.error.validation";
    pub const UNAUTHORIZED: &str = "common.message.error.unauthorized";
    pub const FORBIDDEN: &str = "common.message.error.forbidden";
    pub const CONFLICT: &str = "common.message.error.conflict";
    pub const INVALID_TRANSITION: &str = "common.message.error.invalidTransition";
    pub const INVALID_CREDENTIALS: &str = "auth.message.error.invalidCredentials";
    pub const WAITING_CHECK_EXISTS: &str = "checkInventory.message.error.existWaiting";
    pub const NOT_ALL_APPROVED: &str = "checkInventory.message.error.notAllDetailApproved";
    pub const INSUFFICIENT_STOCK: &str = "material.message.error.insufficientStock";

    /// `<module>.message.error.itemNotExist`
    pub fn item_not_exist(module: &str) -> String {
        format!("{module}.message.error.itemNotExist")
    }
}

static CATALOGUE: Lazy<HashMap<(Locale, &'static str), &'static str>> = Lazy::new(|| {
    use Locale::*;
    let entries: &[(&str, &str, &str)] = &[
        (keys::SUCCESS, "Success", "Thành công"),
        (keys::DELETED, "Deleted successfully", "Xóa thành công"),
        (keys::INTERNAL, "Internal server error", "Lỗi máy chủ"),
        (keys::VALIDATION, "Invalid input", "Dữ liệu không hợp lệ"),
        (keys::UNAUTHORIZED, "Unauthorized", "Chưa đăng nhập"),
        (keys::FORBIDDEN, "You do not have permission to do this", "Bạn không có quyền thực hiện thao tác này"),
        (keys::CONFLICT, "The record conflicts with existing data", "Dữ liệu bị trùng"),
        (keys::INVALID_TRANSITION, "This status change is not allowed", "Không thể chuyển sang trạng thái này"),
        (keys::INVALID_CREDENTIALS, "Email or password is incorrect", "Email hoặc mật khẩu không đúng"),
        (keys::WAITING_CHECK_EXISTS, "An inventory check is already waiting for approval", "Đang có phiếu kiểm kê chờ duyệt"),
        (keys::NOT_ALL_APPROVED, "Every detail line must be approved first", "Tất cả chi tiết kiểm kê phải được duyệt trước"),
        (keys::INSUFFICIENT_STOCK, "Not enough material in stock", "Không đủ nguyên liệu trong kho"),
        ("booking.message.error.itemNotExist", "Booking does not exist", "Đặt bàn không tồn tại"),
        ("table.message.error.itemNotExist", "Table does not exist", "Bàn không tồn tại"),
        ("material.message.error.itemNotExist", "Material does not exist", "Nguyên liệu không tồn tại"),
        ("checkInventory.message.error.itemNotExist", "Inventory check does not exist", "Phiếu kiểm kê không tồn tại"),
        ("checkInventoryDetail.message.error.itemNotExist", "Inventory check line does not exist", "Chi tiết kiểm kê không tồn tại"),
        ("importMaterial.message.error.itemNotExist", "Import receipt does not exist", "Phiếu nhập không tồn tại"),
        ("importMaterialOrder.message.error.itemNotExist", "Import line does not exist", "Chi tiết phiếu nhập không tồn tại"),
        ("exportMaterial.message.error.itemNotExist", "Export receipt does not exist", "Phiếu xuất không tồn tại"),
        ("exportMaterialOrder.message.error.itemNotExist", "Export line does not exist", "Chi tiết phiếu xuất không tồn tại"),
        ("promotion.message.error.itemNotExist", "Promotion does not exist", "Khuyến mãi không tồn tại"),
        ("user.message.error.itemNotExist", "User does not exist", "Người dùng không tồn tại"),
    ];
    let mut map = HashMap::with_capacity(entries.len() * 2);
    for (key, en, vi) in entries {
        map.insert((En, *key), *en);
        map.insert((Vi, *key), *vi);
    }
    map
});

pub fn translate(locale: Locale, key: &str) -> String {
    CATALOGUE
        .get(&(locale, key))
        .map(|s| s.to_string())
        .unwrap_or_else(|| key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_known_key_per_locale() {
        assert_eq!(translate(Locale::En, "booking.message.error.itemNotExist"), "Booking does not exist");
        assert_eq!(translate(Locale::Vi, keys::SUCCESS), "Thành công");
    }

    #[test]
    fn unknown_key_is_echoed() {
        assert_eq!(translate(Locale::Vi, "nope.key"), "nope.key");
    }

    #[test]
    fn accept_language_picks_first_supported() {
        assert_eq!(Locale::from_accept_language(Some("fr-FR,vi;q=0.8,en;q=0.5"), Locale::En), Locale::Vi);
        assert_eq!(Locale::from_accept_language(Some("en-US"), Locale::Vi), Locale::En);
        assert_eq!(Locale::from_accept_language(Some("de"), Locale::Vi), Locale::Vi);
        assert_eq!(Locale::from_accept_language(None, Locale::En), Locale::En);
    }

    #[test]
    fn item_not_exist_key_format() {
        assert_eq!(keys::item_not_exist("promotion"), "promotion.message.error.itemNotExist");
    }
}
