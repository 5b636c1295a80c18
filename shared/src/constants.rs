/// Starting reward pool size, numbered from 1.
pub const DEFAULT_REWARD_POOL_SIZE: u32 = 10;

/// Player whose spins are recorded as zero seconds and never shrink the pool.
pub const DEFAULT_EXEMPT_PLAYER: &str = "MARK";

/// Marker in punishment labels that precedes the alternative point value.
pub const ANNOTATION_MARKER: &str = "แทงปลาไหล";

/// Display labels longer than this are cut and suffixed with an ellipsis.
pub const MAX_DISPLAY_LABEL_CHARS: usize = 16;

/// Default punishments as `(label, seconds, weight)`.
pub const DEFAULT_PUNISHMENTS: &[(&str, u32, u32)] = &[
    ("ดื่ม 0 วินาที", 0, 1),
    ("ดื่ม 1 วินาที หรือ แทงปลาไหล 20", 1, 1),
    ("ดื่ม 2 วินาที หรือ แทงปลาไหล 30", 2, 2),
    ("ดื่ม 3 วินาที หรือ แทงปลาไหล 40", 3, 3),
    ("ดื่ม 4 วินาที หรือ แทงปลาไหล 50", 4, 2),
    ("ดื่ม 5 วินาที หรือ แทงปลาไหล 60", 5, 1),
];

pub const NO_PLAYER_SELECTED_ERROR: &str = "Select a player before spinning the punishment wheel";
pub const EMPTY_PUNISHMENT_WHEEL_ERROR: &str = "No punishment has a weight above 0";
pub const EMPTY_REWARD_POOL_ERROR: &str = "The reward pool is empty, reset it to spin again";
pub const BUDDY_ALREADY_PAIRED_ERROR: &str = "This buddy has already been paired";
pub const PAIR_SELECTION_REQUIRED: &str = "Select both a buddy and a budder first";
pub const PAIR_CONFIRM_REQUIRED: &str = "Press pair again to confirm";

/// Default roster, also used as the punishment wheel's player list.
pub const DEFAULT_BUDDIES: &[&str] = &[
    "พี่ปั๊ป",
    "น้องอ่าย",
    "พี่ป้อง",
    "หมอไนท์",
    "หมอพีท",
    "หมอกานต์",
    "พี่แบงค์",
    "พี่วัจน์",
    "ป๊อป AR",
    "แอ๊น",
    "นันทิชา",
    "พิม Asst",
    "แนน Asst.",
    "สตางค์ Admin",
    "บี๋ ACC",
    "MARK",
    "อามร์",
    "แนท DEV",
    "อีฟ Pur",
    "เจน IB",
    "โจ๊ค DRN",
    "พราว RN",
    "เมย์ RN",
    "พี่แอน RN",
    "ฟ้าใส HPH",
    "พี่บี PH",
    "แอม PH",
    "เขต",
    "แจน PH",
    "หนุงหนิง",
    "ตอง",
    "เดียร์",
    "ชมพู่",
    "มะปราง",
    "เดียร์น่า",
    "หลิน",
    "โอม PMD",
    "นัท PMD",
    "ฟ้า PMD",
    "บังเจี๊ยบ DV",
    "เมย์ HK",
    "บังหมาน DV",
    "หมูแป้ง",
    "แนน PH",
    "สมา",
    "เบญ",
    "นี",
    "เอ้",
    "ตุ๊ก",
    "หลิว",
    "จิ๋ม",
    "เมย์ IB",
    "อ้อน IB",
    "ยาหยี IB",
    "น้าพง",
    "โดม",
    "อู",
    "อาคา",
    "ปาย",
];

pub const DEFAULT_BUDDERS: &[&str] = &[
    "พี่ปั๊ป",
    "น้องอ่าย",
    "พี่ป้อง",
    "หมอไนท์",
    "หมอพีท",
    "หมอกานต์",
    "พี่แบงค์",
    "พี่วัจน์",
    "ป๊อป AR",
    "แอ๊น",
    "นันทิชา",
    "พิม Asst",
    "แนน Asst.",
    "สตางค์ Admin",
    "บี๋ ACC",
    "MARK",
    "อามร์",
    "แนท DEV",
    "อีฟ Pur",
    "เจน IB",
    "โจ๊ค DRN",
    "พราว RN",
    "เมย์ RN",
    "พี่แอน RN",
    "ฟ้าใส HPH",
    "พี่บี PH",
    "แอม PH",
    "เขต",
    "แจน PH",
    "หนุงหนิง",
    "ตอง",
    "เดียร์",
    "ชมพู่",
    "มะปราง",
    "เดียร์น่า",
    "หลิน",
];
