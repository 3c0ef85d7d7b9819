use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Patient,
    Caregiver,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    // Plaintext round-trip; not a security boundary. Never leaves the
    // process: API responses go through UserView.
    pub password: String,
    pub user_type: UserType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medication {
    pub id: u64,
    pub name: String,
    pub dosage: String,
    pub interval: String,
    pub observations: String,
    pub price: String,
    pub pharmacy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Pending,
    Completed,
    Missed,
}

impl std::fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
            Self::Missed => write!(f, "missed"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: u64,
    pub medication_id: u64,
    pub date: NaiveDate,
    pub time: String,
    pub status: ScheduleStatus,
    pub alerted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missed_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Caregiver {
    pub id: u64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub shift: String,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderSettings {
    pub enable_whatsapp: bool,
    pub phone_number: String,
    pub lead_minutes: u32,
    pub custom_message: String,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enable_whatsapp: true,
            phone_number: String::new(),
            lead_minutes: 30,
            custom_message: "Hello! It is time to take your medication.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Purchase {
    pub id: u64,
    pub medication_name: String,
    pub unit_price: String,
    pub pharmacy: String,
    pub date: NaiveDate,
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostCategory {
    General,
    Medications,
    Caregivers,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub author: String,
    pub avatar: String,
    pub content: String,
    pub date: NaiveDate,
    pub likes: u32,
    pub comments: u32,
    pub category: PostCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: u64,
    pub name: String,
    pub members: u32,
    pub category: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub id: u64,
    pub name: String,
    pub generic: String,
    pub classification: String,
    pub usage: String,
    pub side_effects: Vec<String>,
    pub interactions: Vec<String>,
    pub dosage: String,
    pub favorite: bool,
}

/// The whole application document. One instance lives behind the state
/// mutex and is snapshotted to disk after every mutation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppData {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub sessions: BTreeMap<String, u64>,
    #[serde(default)]
    pub medications: Vec<Medication>,
    #[serde(default)]
    pub schedules: Vec<Schedule>,
    #[serde(default)]
    pub active_alerts: BTreeSet<u64>,
    #[serde(default)]
    pub caregivers: Vec<Caregiver>,
    #[serde(default)]
    pub reminder_settings: ReminderSettings,
    #[serde(default)]
    pub purchases: Vec<Purchase>,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub reference: Vec<ReferenceEntry>,
}

impl AppData {
    /// Starter document for a fresh data file: sample content so every
    /// dashboard section has something to show before the first entry.
    pub fn seeded(today: NaiveDate) -> Self {
        let yesterday = today - Duration::days(1);
        Self {
            medications: vec![
                Medication {
                    id: 1,
                    name: "Paracetamol".to_string(),
                    dosage: "500mg".to_string(),
                    interval: "every 6 hours".to_string(),
                    observations: "Take with water".to_string(),
                    price: "R$ 12,90".to_string(),
                    pharmacy: "Drogaria São Paulo".to_string(),
                    image: None,
                },
                Medication {
                    id: 2,
                    name: "Ibuprofen".to_string(),
                    dosage: "200mg".to_string(),
                    interval: "every 8 hours".to_string(),
                    observations: "Take after meals".to_string(),
                    price: "R$ 15,50".to_string(),
                    pharmacy: "Drogasil".to_string(),
                    image: None,
                },
            ],
            schedules: vec![
                Schedule {
                    id: 1,
                    medication_id: 1,
                    date: today,
                    time: "08:00".to_string(),
                    status: ScheduleStatus::Pending,
                    alerted: true,
                    missed_reason: None,
                },
                Schedule {
                    id: 2,
                    medication_id: 2,
                    date: today,
                    time: "14:00".to_string(),
                    status: ScheduleStatus::Pending,
                    alerted: true,
                    missed_reason: None,
                },
                Schedule {
                    id: 3,
                    medication_id: 1,
                    date: today,
                    time: "20:00".to_string(),
                    status: ScheduleStatus::Pending,
                    alerted: false,
                    missed_reason: None,
                },
            ],
            active_alerts: BTreeSet::from([1, 2]),
            caregivers: vec![
                Caregiver {
                    id: 1,
                    name: "Maria Silva".to_string(),
                    phone: "(11) 98765-4321".to_string(),
                    email: "maria.silva@example.com".to_string(),
                    shift: "Morning (07:00 - 15:00)".to_string(),
                    notes: String::new(),
                },
                Caregiver {
                    id: 2,
                    name: "João Pereira".to_string(),
                    phone: "(11) 91234-5678".to_string(),
                    email: "joao.pereira@example.com".to_string(),
                    shift: "Night (23:00 - 07:00)".to_string(),
                    notes: String::new(),
                },
            ],
            purchases: vec![
                Purchase {
                    id: 1,
                    medication_name: "Paracetamol".to_string(),
                    unit_price: "R$ 12,90".to_string(),
                    pharmacy: "Drogaria São Paulo".to_string(),
                    date: today,
                    quantity: 2,
                },
                Purchase {
                    id: 2,
                    medication_name: "Ibuprofen".to_string(),
                    unit_price: "R$ 15,50".to_string(),
                    pharmacy: "Drogasil".to_string(),
                    date: yesterday,
                    quantity: 1,
                },
            ],
            posts: vec![
                Post {
                    id: 1,
                    author: "Maria Silva".to_string(),
                    avatar: "MS".to_string(),
                    content: "Any tips for remembering evening doses? I keep forgetting my Losartan."
                        .to_string(),
                    date: today - Duration::days(2),
                    likes: 5,
                    comments: 3,
                    category: PostCategory::Medications,
                },
                Post {
                    id: 2,
                    author: "João Pereira".to_string(),
                    avatar: "JP".to_string(),
                    content: "Found a pharmacy with free delivery for seniors. Has anyone tried it?"
                        .to_string(),
                    date: yesterday,
                    likes: 8,
                    comments: 6,
                    category: PostCategory::General,
                },
                Post {
                    id: 3,
                    author: "Ana Rodrigues".to_string(),
                    avatar: "AR".to_string(),
                    content: "Looking for a caregiver for my father. Can anyone recommend someone reliable?"
                        .to_string(),
                    date: today,
                    likes: 3,
                    comments: 4,
                    category: PostCategory::Caregivers,
                },
            ],
            groups: vec![
                Group {
                    id: 1,
                    name: "Living Well with Diabetes".to_string(),
                    members: 342,
                    category: "Condition".to_string(),
                    description: "A space for people with diabetes to share routines and medication tips."
                        .to_string(),
                },
                Group {
                    id: 2,
                    name: "Caregivers United".to_string(),
                    members: 189,
                    category: "Caregivers".to_string(),
                    description: "Support network for caregivers of elderly patients.".to_string(),
                },
                Group {
                    id: 3,
                    name: "Heart Health".to_string(),
                    members: 256,
                    category: "Condition".to_string(),
                    description: "Blood pressure, statins and everything in between.".to_string(),
                },
            ],
            reference: vec![
                ReferenceEntry {
                    id: 1,
                    name: "Losartan Potassium".to_string(),
                    generic: "Losartan".to_string(),
                    classification: "Antihypertensive".to_string(),
                    usage: "Treatment of high blood pressure and heart failure".to_string(),
                    side_effects: vec![
                        "Dizziness".to_string(),
                        "Headache".to_string(),
                        "Fatigue".to_string(),
                        "Dry cough".to_string(),
                    ],
                    interactions: vec![
                        "NSAIDs".to_string(),
                        "Potassium supplements".to_string(),
                        "Lithium".to_string(),
                    ],
                    dosage: "25-100mg once daily".to_string(),
                    favorite: false,
                },
                ReferenceEntry {
                    id: 2,
                    name: "Glifage XR".to_string(),
                    generic: "Metformin".to_string(),
                    classification: "Antidiabetic".to_string(),
                    usage: "Type 2 diabetes control".to_string(),
                    side_effects: vec![
                        "Diarrhea".to_string(),
                        "Nausea".to_string(),
                        "Abdominal discomfort".to_string(),
                        "Metallic taste".to_string(),
                    ],
                    interactions: vec![
                        "Cimetidine".to_string(),
                        "Corticosteroids".to_string(),
                        "Diuretics".to_string(),
                    ],
                    dosage: "500-2500mg per day, in divided doses".to_string(),
                    favorite: false,
                },
                ReferenceEntry {
                    id: 3,
                    name: "Simvastatin".to_string(),
                    generic: "Simvastatin".to_string(),
                    classification: "Statin".to_string(),
                    usage: "Cholesterol reduction and cardiovascular prevention".to_string(),
                    side_effects: vec![
                        "Muscle pain".to_string(),
                        "Headache".to_string(),
                        "Digestive upset".to_string(),
                        "Insomnia".to_string(),
                    ],
                    interactions: vec![
                        "Amiodarone".to_string(),
                        "Cyclosporine".to_string(),
                        "Diltiazem".to_string(),
                        "Grapefruit juice".to_string(),
                    ],
                    dosage: "5-40mg once daily, at night".to_string(),
                    favorite: false,
                },
                ReferenceEntry {
                    id: 4,
                    name: "Puran T4".to_string(),
                    generic: "Levothyroxine".to_string(),
                    classification: "Thyroid hormone".to_string(),
                    usage: "Hypothyroidism treatment".to_string(),
                    side_effects: vec![
                        "Palpitations".to_string(),
                        "Insomnia".to_string(),
                        "Tremors".to_string(),
                        "Increased sweating".to_string(),
                    ],
                    interactions: vec![
                        "Antacids".to_string(),
                        "Sertraline".to_string(),
                        "Carbamazepine".to_string(),
                        "Phenytoin".to_string(),
                    ],
                    dosage: "25-200mcg once daily, fasting".to_string(),
                    favorite: false,
                },
                ReferenceEntry {
                    id: 5,
                    name: "Rivotril".to_string(),
                    generic: "Clonazepam".to_string(),
                    classification: "Benzodiazepine".to_string(),
                    usage: "Anxiety disorders and seizures".to_string(),
                    side_effects: vec![
                        "Drowsiness".to_string(),
                        "Dizziness".to_string(),
                        "Fatigue".to_string(),
                        "Impaired coordination".to_string(),
                    ],
                    interactions: vec![
                        "Alcohol".to_string(),
                        "Other CNS depressants".to_string(),
                        "Antidepressants".to_string(),
                    ],
                    dosage: "0.5-2mg two or three times daily".to_string(),
                    favorite: false,
                },
            ],
            ..Self::default()
        }
    }
}

/// One greater than the current maximum id, or 1 for an empty list.
pub fn next_id<T>(items: &[T], id_of: impl Fn(&T) -> u64) -> u64 {
    items.iter().map(id_of).max().map_or(1, |max| max + 1)
}

// ---- request payloads -------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub user_type: UserType,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct MedicationForm {
    pub name: String,
    pub dosage: String,
    #[serde(default)]
    pub interval: String,
    #[serde(default)]
    pub observations: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub pharmacy: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleForm {
    pub medication_id: u64,
    pub date: NaiveDate,
    pub time: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: ScheduleStatus,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CaregiverForm {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub shift: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Deserialize)]
pub struct PostForm {
    pub author: String,
    #[serde(default)]
    pub avatar: String,
    pub content: String,
    pub category: PostCategory,
}

#[derive(Debug, Deserialize)]
pub struct ReferenceQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub favorites: bool,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

// ---- response payloads ------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub user_type: UserType,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            user_type: user.user_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPeriod {
    Morning,
    Afternoon,
    Night,
}

#[derive(Debug, Serialize)]
pub struct ScheduleView {
    pub id: u64,
    pub medication_id: u64,
    pub medication_name: String,
    pub date: NaiveDate,
    pub time: String,
    pub status: ScheduleStatus,
    pub alerted: bool,
    pub alert_active: bool,
    pub period: DayPeriod,
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct TestLinksResponse {
    pub direct_url: String,
    pub phone_url: String,
}

// ---- report rows ------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DoseStatus {
    Taken,
    Missed,
}

impl std::fmt::Display for DoseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Taken => write!(f, "taken"),
            Self::Missed => write!(f, "missed"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MedicationReportRow {
    pub schedule_id: u64,
    pub name: String,
    pub dosage: String,
    pub date: NaiveDate,
    pub time: String,
    pub status: DoseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QualityReportRow {
    pub medication_name: String,
    pub total_doses: u32,
    pub taken_doses: u32,
    pub missed_doses: u32,
    pub adherence_rate: f64,
}

#[derive(Debug, Serialize)]
pub struct QualityReport {
    pub rows: Vec<QualityReportRow>,
    pub average_adherence: f64,
    pub total_taken: u32,
    pub total_missed: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinancialReportRow {
    pub purchase_id: u64,
    pub medication_name: String,
    pub unit_price: String,
    pub pharmacy: String,
    pub date: NaiveDate,
    pub quantity: u32,
    pub total: String,
}

#[derive(Debug, Serialize)]
pub struct FinancialReport {
    pub rows: Vec<FinancialReportRow>,
    pub grand_total: String,
}
