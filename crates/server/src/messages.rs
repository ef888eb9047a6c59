//! Bilingual status messages returned in every response body.

use serde::Serialize;

/// A user-facing message in Thai and English.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MessageStatus {
    pub thai: &'static str,
    pub eng: &'static str,
}

impl MessageStatus {
    const fn new(thai: &'static str, eng: &'static str) -> Self {
        Self { thai, eng }
    }
}

pub const CREATED: MessageStatus = MessageStatus::new(
    "ข้อความของคุณถูกเพิ่มแล้ว!",
    "Your message has been inserted successfully",
);

pub const INVALID_INPUT: MessageStatus = MessageStatus::new(
    "มีบางอย่างผิดพลาด โปรดตรวจสอบข้อมูลของคุณ",
    "Something went wrong please check your information",
);

pub const SAVE_FAILED: MessageStatus = MessageStatus::new(
    "ไม่สามารถบันทึกข้อมูลได้ กรุณาลองใหม่อีกครั้ง",
    "Unable to save your data. Please try again later",
);

pub const UPLOADED: MessageStatus = MessageStatus::new(
    "อัปโหลดรูปของคุณสำเร็จ",
    "Your photo has been uploaded successfully",
);

pub const UPLOAD_MISSING: MessageStatus = MessageStatus::new(
    "ไม่สามารถอัพโหลดรูปของคุณได้",
    "Unable to upload your photo. Please try again",
);

pub const UPLOAD_TOO_LARGE: MessageStatus = MessageStatus::new(
    "ไฟล์รูปภาพมีขนาดใหญ่เกินไป",
    "Your photo is too large",
);

pub const PHOTO_FAILED: MessageStatus = MessageStatus::new(
    "เกิดปัญหาระหว่างการจัดการไฟล์รูปภาพ",
    "An error occurred while handling your photo",
);

pub const PHOTO_NOT_FOUND: MessageStatus =
    MessageStatus::new("ไม่พบไฟล์รูปภาพ", "Can not find photo");

pub const LOADED: MessageStatus =
    MessageStatus::new("โหลดข้อมูลสำเร็จ", "download information successfully");

pub const NOT_FOUND: MessageStatus = MessageStatus::new("ไม่พบข้อมูล", "document not found");

pub const LOOKUP_FAILED: MessageStatus =
    MessageStatus::new("ไม่สามารถหาข้อมูลได้", "Can not find data");

pub const DELETED: MessageStatus =
    MessageStatus::new("ลบข้อมูลสำเร็จ", "Data has been deleted successfully");

pub const FILE_DELETE_FAILED: MessageStatus =
    MessageStatus::new("ไม่สามารถลบรูปภาพได้", "Can't delete your photo");

pub const RECORD_DELETE_FAILED: MessageStatus =
    MessageStatus::new("ไม่สามารถลบข้อมูลได้", "Can't delete data");

pub const PARTIAL_DELETE: MessageStatus = MessageStatus::new(
    "ลบรูปภาพแล้ว แต่ไม่สามารถลบข้อมูลได้",
    "Your photo was deleted but the data could not be deleted",
);

pub const ORPHANS_REMOVED: MessageStatus = MessageStatus::new(
    "ลบข้อมูลที่ไม่มีรูปภาพเรียบร้อยแล้ว",
    "Records without a photo have been removed",
);

pub const FORBIDDEN: MessageStatus = MessageStatus::new(
    "ไม่มีสิทธิ์เข้าถึง",
    "Forbidden: Invalid API Key",
);

pub const BAD_REQUEST: MessageStatus = MessageStatus::new(
    "คำขอไม่ถูกต้อง",
    "The request could not be understood",
);
