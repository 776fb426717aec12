//! Roster domain services.
//!
//! `RosterService` implements the student and course driving ports over the
//! two repository ports, including the merge-on-save rule for students and
//! the save-by-title rule for courses.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use pagination::PageRequest;
use serde_json::json;

use crate::domain::course::{Course, CourseDraft, CourseId, CourseName, Department};
use crate::domain::error::Error;
use crate::domain::listing::{
    CourseFilter, CourseSort, StudentFilter, StudentSort, course_plan, student_plan,
};
use crate::domain::ports::{
    CourseCatalog, CourseListing, CourseRepository, CourseRepositoryError, SaveCourseRequest,
    SaveStudentRequest, StudentDirectory, StudentListing, StudentRepository,
    StudentRepositoryError,
};
use crate::domain::student::{Student, StudentDraft, StudentId};

/// Roster service implementing the student and course driving ports.
#[derive(Clone)]
pub struct RosterService<S, C> {
    students: Arc<S>,
    courses: Arc<C>,
}

impl<S, C> RosterService<S, C> {
    /// Create a new service with the given repositories.
    pub fn new(students: Arc<S>, courses: Arc<C>) -> Self {
        Self { students, courses }
    }
}

impl<S, C> RosterService<S, C>
where
    S: StudentRepository,
    C: CourseRepository,
{
    fn map_student_error(error: StudentRepositoryError) -> Error {
        match error {
            StudentRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("student repository unavailable: {message}"))
            }
            StudentRepositoryError::Query { message } => {
                Error::internal(format!("student repository error: {message}"))
            }
        }
    }

    fn map_course_error(error: CourseRepositoryError) -> Error {
        match error {
            CourseRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("course repository unavailable: {message}"))
            }
            CourseRepositoryError::Query { message } => {
                Error::internal(format!("course repository error: {message}"))
            }
            CourseRepositoryError::DuplicateName { name } => {
                Error::conflict(format!("course name `{name}` already exists")).with_details(
                    json!({"courseName": name, "code": "duplicate_course_name"}),
                )
            }
        }
    }

    fn unknown_student(id: StudentId) -> Error {
        Error::not_found(format!("student {id} not found"))
            .with_details(json!({"studentId": id.as_i64()}))
    }

    fn unknown_course(id: CourseId) -> Error {
        Error::not_found(format!("course {id} not found"))
            .with_details(json!({"courseId": id.as_i64()}))
    }

    /// Resolve requested course ids against the catalogue, rejecting the
    /// first unknown id.
    async fn resolve_courses(&self, course_ids: &[CourseId]) -> Result<Vec<Course>, Error> {
        let mut resolved = Vec::with_capacity(course_ids.len());
        for id in course_ids {
            let course = self
                .courses
                .find_by_id(*id)
                .await
                .map_err(Self::map_course_error)?
                .ok_or_else(|| Self::unknown_course(*id))?;
            resolved.push(course);
        }
        Ok(resolved)
    }

    async fn distinct_departments(&self) -> Result<Vec<Department>, Error> {
        let all = self
            .courses
            .find_all()
            .await
            .map_err(Self::map_course_error)?;
        let departments: BTreeSet<Department> = all
            .iter()
            .map(|course| course.department().clone())
            .collect();
        Ok(departments.into_iter().collect())
    }
}

#[async_trait]
impl<S, C> StudentDirectory for RosterService<S, C>
where
    S: StudentRepository,
    C: CourseRepository,
{
    async fn list_students(
        &self,
        filter: StudentFilter,
        page: PageRequest,
        sort: StudentSort,
    ) -> Result<StudentListing, Error> {
        let plan = student_plan(&filter);
        let page = self
            .students
            .list(&plan, page, sort)
            .await
            .map_err(Self::map_student_error)?;
        let courses = self
            .courses
            .find_all()
            .await
            .map_err(Self::map_course_error)?;
        Ok(StudentListing { page, courses })
    }

    async fn get_student(&self, id: StudentId) -> Result<Student, Error> {
        self.students
            .find_by_id(id)
            .await
            .map_err(Self::map_student_error)?
            .ok_or_else(|| Self::unknown_student(id))
    }

    async fn save_student(&self, request: SaveStudentRequest) -> Result<Student, Error> {
        let resolved = self.resolve_courses(&request.course_ids).await?;
        let requested: BTreeSet<CourseId> = resolved.iter().map(Course::id).collect();

        let candidates = self
            .students
            .find_by_name(&request.first_name, &request.last_name)
            .await
            .map_err(Self::map_student_error)?;

        // The first same-named student already enrolled in every requested
        // course absorbs the save. A same-named student missing any of
        // them is left alone and a new record is created instead.
        if let Some(existing) = candidates
            .into_iter()
            .find(|candidate| candidate.enrolled_in_all(&requested))
        {
            let mut merged = existing.courses().to_vec();
            merged.extend(resolved);
            let survivor =
                Student::new(existing.id(), request.first_name, request.last_name, merged);
            return self
                .students
                .update(&survivor)
                .await
                .map_err(Self::map_student_error);
        }

        let draft = StudentDraft::new(request.first_name, request.last_name, resolved);
        self.students
            .insert(&draft)
            .await
            .map_err(Self::map_student_error)
    }

    async fn replace_student(
        &self,
        id: StudentId,
        request: SaveStudentRequest,
    ) -> Result<Student, Error> {
        self.students
            .find_by_id(id)
            .await
            .map_err(Self::map_student_error)?
            .ok_or_else(|| Self::unknown_student(id))?;

        let resolved = self.resolve_courses(&request.course_ids).await?;
        let student = Student::new(id, request.first_name, request.last_name, resolved);
        self.students
            .update(&student)
            .await
            .map_err(Self::map_student_error)
    }

    async fn delete_student(&self, id: StudentId) -> Result<(), Error> {
        let deleted = self
            .students
            .delete(id)
            .await
            .map_err(Self::map_student_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Self::unknown_student(id))
        }
    }

    async fn students_in_course(&self, course_name: CourseName) -> Result<Vec<Student>, Error> {
        self.students
            .find_by_course_name(&course_name)
            .await
            .map_err(Self::map_student_error)
    }
}

#[async_trait]
impl<S, C> CourseCatalog for RosterService<S, C>
where
    S: StudentRepository,
    C: CourseRepository,
{
    async fn list_courses(
        &self,
        filter: CourseFilter,
        page: PageRequest,
        sort: CourseSort,
    ) -> Result<CourseListing, Error> {
        let plan = course_plan(&filter);
        let page = self
            .courses
            .list(&plan, page, sort)
            .await
            .map_err(Self::map_course_error)?;
        let departments = self.distinct_departments().await?;
        Ok(CourseListing { page, departments })
    }

    async fn get_course(&self, id: CourseId) -> Result<Course, Error> {
        self.courses
            .find_by_id(id)
            .await
            .map_err(Self::map_course_error)?
            .ok_or_else(|| Self::unknown_course(id))
    }

    async fn save_course(&self, request: SaveCourseRequest) -> Result<Course, Error> {
        let existing = self
            .courses
            .find_by_name(&request.name)
            .await
            .map_err(Self::map_course_error)?;

        match existing {
            Some(course) => {
                let updated = Course::new(course.id(), request.name, request.department);
                self.courses
                    .update(&updated)
                    .await
                    .map_err(Self::map_course_error)
            }
            None => {
                let draft = CourseDraft::new(request.name, request.department);
                self.courses
                    .insert(&draft)
                    .await
                    .map_err(Self::map_course_error)
            }
        }
    }

    async fn rename_course(&self, id: CourseId, name: CourseName) -> Result<Course, Error> {
        let existing = self
            .courses
            .find_by_id(id)
            .await
            .map_err(Self::map_course_error)?
            .ok_or_else(|| Self::unknown_course(id))?;

        let renamed = Course::new(id, name, existing.department().clone());
        self.courses
            .update(&renamed)
            .await
            .map_err(Self::map_course_error)
    }

    async fn delete_course(&self, id: CourseId) -> Result<(), Error> {
        let deleted = self
            .courses
            .delete(id)
            .await
            .map_err(Self::map_course_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Self::unknown_course(id))
        }
    }
}
