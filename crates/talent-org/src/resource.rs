//! Protected resource models
//!
//! This module defines the three protected resource types — candidate
//! records, conversation threads, and call recordings — and the small set of
//! capability traits the access evaluator depends on. The evaluator never
//! probes attributes dynamically; every resource variant states explicitly
//! which scopes it carries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of a protected resource.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A candidate/contact record
    CandidateRecord,

    /// A conversation thread, optionally linked to a candidate
    ConversationThread,

    /// A call recording, optionally linked to a candidate
    CallRecording,
}

impl ResourceKind {
    /// Get the string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CandidateRecord => "candidate_record",
            Self::ConversationThread => "conversation_thread",
            Self::CallRecording => "call_recording",
        }
    }

    /// Parse a resource kind from its string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "candidate_record" => Some(Self::CandidateRecord),
            "conversation_thread" => Some(Self::ConversationThread),
            "call_recording" => Some(Self::CallRecording),
            _ => None,
        }
    }

    /// Get all resource kinds.
    pub fn all() -> Vec<Self> {
        vec![
            Self::CandidateRecord,
            Self::ConversationThread,
            Self::CallRecording,
        ]
    }
}

/// A resource that belongs to exactly one organization.
pub trait OrgScoped {
    /// The owning organization.
    fn org_id(&self) -> Uuid;
}

/// A resource with an owner/creator.
pub trait Owned {
    /// The owning user, if the creator is still known.
    fn owner_id(&self) -> Option<Uuid>;
}

/// A resource optionally filed under a department.
pub trait DepartmentScoped {
    /// The department, if any. When set, it belongs to the same
    /// organization as the resource.
    fn department_id(&self) -> Option<Uuid>;
}

/// A resource optionally linked to a candidate record.
pub trait LinkedEntity {
    /// The linked candidate record, if any.
    fn linked_candidate_id(&self) -> Option<Uuid>;
}

/// The full interface the access evaluator requires of a resource.
pub trait ProtectedResource: OrgScoped + Owned + DepartmentScoped + LinkedEntity {
    /// Unique resource ID.
    fn id(&self) -> Uuid;

    /// The resource kind.
    fn kind(&self) -> ResourceKind;
}

/// A candidate/contact record.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use talent_org::{CandidateRecord, ProtectedResource, ResourceKind};
///
/// let org_id = Uuid::now_v7();
/// let recruiter = Uuid::now_v7();
/// let candidate = CandidateRecord::new(org_id, recruiter, "Jordan Doe");
/// assert_eq!(candidate.kind(), ResourceKind::CandidateRecord);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// Unique record ID
    pub id: Uuid,

    /// Owning organization
    pub organization_id: Uuid,

    /// Department the candidate is filed under, if any
    pub department_id: Option<Uuid>,

    /// The user who created the record
    pub created_by: Uuid,

    /// Candidate display name
    pub full_name: String,

    /// When the record was created
    pub created_at: DateTime<Utc>,
}

impl CandidateRecord {
    /// Creates a new candidate record.
    pub fn new(organization_id: Uuid, created_by: Uuid, full_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            organization_id,
            department_id: None,
            created_by,
            full_name: full_name.into(),
            created_at: Utc::now(),
        }
    }

    /// File the candidate under a department.
    pub fn with_department(mut self, department_id: Uuid) -> Self {
        self.department_id = Some(department_id);
        self
    }
}

impl OrgScoped for CandidateRecord {
    fn org_id(&self) -> Uuid {
        self.organization_id
    }
}

impl Owned for CandidateRecord {
    fn owner_id(&self) -> Option<Uuid> {
        Some(self.created_by)
    }
}

impl DepartmentScoped for CandidateRecord {
    fn department_id(&self) -> Option<Uuid> {
        self.department_id
    }
}

impl LinkedEntity for CandidateRecord {
    fn linked_candidate_id(&self) -> Option<Uuid> {
        None
    }
}

impl ProtectedResource for CandidateRecord {
    fn id(&self) -> Uuid {
        self.id
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::CandidateRecord
    }
}

/// A conversation thread with a candidate or contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationThread {
    /// Unique thread ID
    pub id: Uuid,

    /// Owning organization
    pub organization_id: Uuid,

    /// Department the thread is filed under, if any
    pub department_id: Option<Uuid>,

    /// The user who started the thread
    pub created_by: Uuid,

    /// Linked candidate record, if any
    pub candidate_id: Option<Uuid>,

    /// Thread subject line
    pub subject: String,

    /// When the thread was started
    pub created_at: DateTime<Utc>,
}

impl ConversationThread {
    /// Creates a new conversation thread.
    pub fn new(organization_id: Uuid, created_by: Uuid, subject: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            organization_id,
            department_id: None,
            created_by,
            candidate_id: None,
            subject: subject.into(),
            created_at: Utc::now(),
        }
    }

    /// File the thread under a department.
    pub fn with_department(mut self, department_id: Uuid) -> Self {
        self.department_id = Some(department_id);
        self
    }

    /// Link the thread to a candidate record.
    pub fn with_candidate(mut self, candidate_id: Uuid) -> Self {
        self.candidate_id = Some(candidate_id);
        self
    }
}

impl OrgScoped for ConversationThread {
    fn org_id(&self) -> Uuid {
        self.organization_id
    }
}

impl Owned for ConversationThread {
    fn owner_id(&self) -> Option<Uuid> {
        Some(self.created_by)
    }
}

impl DepartmentScoped for ConversationThread {
    fn department_id(&self) -> Option<Uuid> {
        self.department_id
    }
}

impl LinkedEntity for ConversationThread {
    fn linked_candidate_id(&self) -> Option<Uuid> {
        self.candidate_id
    }
}

impl ProtectedResource for ConversationThread {
    fn id(&self) -> Uuid {
        self.id
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::ConversationThread
    }
}

/// A recorded call, optionally linked to a candidate record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRecording {
    /// Unique recording ID
    pub id: Uuid,

    /// Owning organization
    pub organization_id: Uuid,

    /// Department the recording is filed under, if any
    pub department_id: Option<Uuid>,

    /// The user who made/uploaded the recording
    pub created_by: Uuid,

    /// Linked candidate record, if any
    pub candidate_id: Option<Uuid>,

    /// Call duration in seconds
    pub duration_secs: u32,

    /// When the recording was created
    pub created_at: DateTime<Utc>,
}

impl CallRecording {
    /// Creates a new call recording.
    pub fn new(organization_id: Uuid, created_by: Uuid, duration_secs: u32) -> Self {
        Self {
            id: Uuid::now_v7(),
            organization_id,
            department_id: None,
            created_by,
            candidate_id: None,
            duration_secs,
            created_at: Utc::now(),
        }
    }

    /// File the recording under a department.
    pub fn with_department(mut self, department_id: Uuid) -> Self {
        self.department_id = Some(department_id);
        self
    }

    /// Link the recording to a candidate record.
    pub fn with_candidate(mut self, candidate_id: Uuid) -> Self {
        self.candidate_id = Some(candidate_id);
        self
    }
}

impl OrgScoped for CallRecording {
    fn org_id(&self) -> Uuid {
        self.organization_id
    }
}

impl Owned for CallRecording {
    fn owner_id(&self) -> Option<Uuid> {
        Some(self.created_by)
    }
}

impl DepartmentScoped for CallRecording {
    fn department_id(&self) -> Option<Uuid> {
        self.department_id
    }
}

impl LinkedEntity for CallRecording {
    fn linked_candidate_id(&self) -> Option<Uuid> {
        self.candidate_id
    }
}

impl ProtectedResource for CallRecording {
    fn id(&self) -> Uuid {
        self.id
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::CallRecording
    }
}

/// Flattened resource row as stores return it.
///
/// Stores hand the evaluator one uniform shape regardless of the underlying
/// table; the evaluator still only consumes it through the capability traits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Resource ID
    pub id: Uuid,

    /// Resource kind
    pub kind: ResourceKind,

    /// Owning organization
    pub organization_id: Uuid,

    /// Department, if any
    pub department_id: Option<Uuid>,

    /// Owner/creator, if known
    pub owner_id: Option<Uuid>,

    /// Linked candidate record, if any
    pub linked_candidate_id: Option<Uuid>,
}

impl OrgScoped for ResourceRecord {
    fn org_id(&self) -> Uuid {
        self.organization_id
    }
}

impl Owned for ResourceRecord {
    fn owner_id(&self) -> Option<Uuid> {
        self.owner_id
    }
}

impl DepartmentScoped for ResourceRecord {
    fn department_id(&self) -> Option<Uuid> {
        self.department_id
    }
}

impl LinkedEntity for ResourceRecord {
    fn linked_candidate_id(&self) -> Option<Uuid> {
        self.linked_candidate_id
    }
}

impl ProtectedResource for ResourceRecord {
    fn id(&self) -> Uuid {
        self.id
    }

    fn kind(&self) -> ResourceKind {
        self.kind
    }
}

impl From<&CandidateRecord> for ResourceRecord {
    fn from(r: &CandidateRecord) -> Self {
        Self {
            id: r.id,
            kind: ResourceKind::CandidateRecord,
            organization_id: r.organization_id,
            department_id: r.department_id,
            owner_id: Some(r.created_by),
            linked_candidate_id: None,
        }
    }
}

impl From<&ConversationThread> for ResourceRecord {
    fn from(r: &ConversationThread) -> Self {
        Self {
            id: r.id,
            kind: ResourceKind::ConversationThread,
            organization_id: r.organization_id,
            department_id: r.department_id,
            owner_id: Some(r.created_by),
            linked_candidate_id: r.candidate_id,
        }
    }
}

impl From<&CallRecording> for ResourceRecord {
    fn from(r: &CallRecording) -> Self {
        Self {
            id: r.id,
            kind: ResourceKind::CallRecording,
            organization_id: r.organization_id,
            department_id: r.department_id,
            owner_id: Some(r.created_by),
            linked_candidate_id: r.candidate_id,
        }
    }
}
