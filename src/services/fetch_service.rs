use std::future::Future;
use std::sync::Arc;

use tracing::{info, warn};

use crate::{error::AppError, api::CourseApi};
use crate::models::{Catalogs, CourseId, CourseSetting, EntryKind, LinkKind, LinkedCollections};

/// Everything loaded for one selected course in phase 2.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseScope {
    pub linked: LinkedCollections,
    pub setting: Option<CourseSetting>,
}

pub struct FetchService {
    api: Arc<dyn CourseApi>,
}

impl FetchService {
    pub fn new(api: Arc<dyn CourseApi>) -> Self {
        Self { api }
    }

    /// Phase 1: the seven catalog reads, run together and awaited together.
    ///
    /// Every read except the course list degrades to an empty collection.
    /// A failed course list fails the phase once all seven have settled.
    pub async fn load_catalogs(&self) -> Result<Catalogs, AppError> {
        info!("Loading catalogs");
        let api = &self.api;
        let (categories, course_types, eligibilities, courses, instructors, specialities, partners) = tokio::join!(
            best_effort("categories", api.list_categories()),
            best_effort("course types", api.list_course_types()),
            best_effort("eligibility catalog", api.list_eligibilities()),
            api.list_courses(),
            best_effort("instructor catalog", api.list_instructors()),
            best_effort("specialities", api.list_specialities()),
            best_effort("accreditation partner catalog", api.list_accreditation_partners()),
        );

        let courses = courses.inspect_err(|e| warn!("Failed to load course list: {}", e))?;

        Ok(Catalogs {
            categories,
            course_types,
            eligibilities,
            courses,
            instructors,
            specialities,
            accreditation_partners: partners,
        })
    }

    /// Phase 2: course-scoped reads, each failing on its own.
    ///
    /// A missing settings record is `None`, not an error.
    pub async fn load_course_scope(&self, course_id: CourseId) -> CourseScope {
        info!("Loading linked collections for course {}", course_id);
        let api = &self.api;
        let (eligibilities, keywords, setting, instructors, intended_audiences, accreditation_partners) = tokio::join!(
            best_effort("eligibility links", api.course_links(course_id, LinkKind::Eligibilities)),
            best_effort("keywords", api.course_entries(course_id, EntryKind::Keywords)),
            api.course_setting(course_id),
            best_effort("instructor links", api.course_links(course_id, LinkKind::Instructors)),
            best_effort("intended audiences", api.course_entries(course_id, EntryKind::IntendedAudiences)),
            best_effort(
                "accreditation partner links",
                api.course_links(course_id, LinkKind::AccreditationPartners)
            ),
        );

        let setting = match setting {
            Ok(setting) => {
                if setting.is_none() {
                    info!("Course {} has no settings record yet", course_id);
                }
                setting
            }
            Err(e) => {
                warn!("Failed to load settings for course {}: {}", course_id, e);
                None
            }
        };

        CourseScope {
            linked: LinkedCollections {
                eligibilities,
                keywords,
                instructors,
                intended_audiences,
                accreditation_partners,
            },
            setting,
        }
    }
}

async fn best_effort<T, F>(label: &str, fetch: F) -> Vec<T>
where
    F: Future<Output = Result<Vec<T>, AppError>>,
{
    match fetch.await {
        Ok(items) => items,
        Err(e) => {
            warn!("Failed to load {}, using empty list: {}", label, e);
            Vec::new()
        }
    }
}
