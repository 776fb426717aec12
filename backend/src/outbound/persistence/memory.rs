//! In-memory repository adapters.
//!
//! Back the service in tests and when no database is configured. One shared
//! store holds both tables and the enrolment pair-set so the two adapters
//! agree on cascades, and the filtering, ordering, and paging semantics
//! match the Diesel adapters.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use pagination::{PAGE_SIZE, Page, PageRequest, SortDirection};

use crate::domain::ports::{
    CourseRepository, CourseRepositoryError, StudentRepository, StudentRepositoryError,
};
use crate::domain::{
    Course, CourseDraft, CourseId, CourseListPlan, CourseName, CourseSort, CourseSortField,
    FirstName, LastName, Student, StudentDraft, StudentId, StudentListPlan, StudentSort,
    StudentSortField,
};

const PAGE_LEN: usize = PAGE_SIZE as usize;

/// Paired student and course repositories over one shared store.
pub fn in_memory_repositories() -> (InMemoryStudentRepository, InMemoryCourseRepository) {
    let state = Arc::new(Mutex::new(InMemoryState::default()));
    (
        InMemoryStudentRepository {
            state: Arc::clone(&state),
        },
        InMemoryCourseRepository { state },
    )
}

#[derive(Debug, Clone)]
struct StudentRecord {
    first_name: FirstName,
    last_name: LastName,
}

/// Shared storage behind the in-memory adapters.
#[derive(Debug, Default)]
struct InMemoryState {
    students: BTreeMap<i64, StudentRecord>,
    courses: BTreeMap<i64, Course>,
    enrollments: BTreeSet<(i64, i64)>,
    next_student_id: i64,
    next_course_id: i64,
}

impl InMemoryState {
    fn student(&self, id: i64, record: &StudentRecord) -> Student {
        let courses = self
            .enrollments
            .iter()
            .filter(|(student_id, _)| *student_id == id)
            .filter_map(|(_, course_id)| self.courses.get(course_id))
            .cloned()
            .collect();
        Student::new(
            StudentId::new(id),
            record.first_name.clone(),
            record.last_name.clone(),
            courses,
        )
    }

    /// All students, id ascending.
    fn all_students(&self) -> Vec<Student> {
        self.students
            .iter()
            .map(|(id, record)| self.student(*id, record))
            .collect()
    }

    fn replace_enrolments(&mut self, student_id: i64, courses: &[Course]) {
        self.enrollments
            .retain(|(enrolled, _)| *enrolled != student_id);
        for course in courses {
            self.enrollments.insert((student_id, course.id().as_i64()));
        }
    }

    /// Reject course references the catalogue does not hold, as the
    /// database's foreign key would.
    fn check_courses_exist(&self, courses: &[Course]) -> Result<(), String> {
        for course in courses {
            if !self.courses.contains_key(&course.id().as_i64()) {
                return Err(format!(
                    "enrolment references unknown course id {}",
                    course.id()
                ));
            }
        }
        Ok(())
    }

    fn course_name_taken(&self, name: &CourseName, except_id: Option<CourseId>) -> bool {
        self.courses
            .values()
            .any(|course| course.name() == name && Some(course.id()) != except_id)
    }
}

fn student_plan_matches(plan: &StudentListPlan, student: &Student) -> bool {
    match plan {
        StudentListPlan::ByFullNameAndCourse {
            first_name,
            last_name,
            course_name,
        } => {
            student.first_name().as_ref() == first_name
                && student.last_name().as_ref() == last_name
                && enrolled_in_exact(student, course_name)
        }
        StudentListPlan::ByFirstNameAndCourse {
            first_name,
            course_name,
        } => student.first_name().as_ref() == first_name && enrolled_in_exact(student, course_name),
        StudentListPlan::ByLastNameAndCourse {
            last_name,
            course_name,
        } => student.last_name().as_ref() == last_name && enrolled_in_exact(student, course_name),
        StudentListPlan::ByCourseContains { course_name } => student
            .courses()
            .iter()
            .any(|course| course.name().as_ref().contains(course_name.as_str())),
        StudentListPlan::ByFullName {
            first_name,
            last_name,
        } => {
            student.first_name().as_ref() == first_name
                && student.last_name().as_ref() == last_name
        }
        StudentListPlan::ByFirstName { first_name } => {
            student.first_name().as_ref() == first_name
        }
        StudentListPlan::ByLastName { last_name } => student.last_name().as_ref() == last_name,
        StudentListPlan::All => true,
    }
}

fn enrolled_in_exact(student: &Student, course_name: &str) -> bool {
    student
        .courses()
        .iter()
        .any(|course| course.name().as_ref() == course_name)
}

fn course_plan_matches(plan: &CourseListPlan, course: &Course) -> bool {
    match plan {
        CourseListPlan::ByNameAndDepartment {
            course_name,
            department,
        } => course.name().as_ref() == course_name && course.department().as_ref() == department,
        CourseListPlan::ByName { course_name } => course.name().as_ref() == course_name,
        CourseListPlan::ByDepartment { department } => {
            course.department().as_ref() == department
        }
        CourseListPlan::All => true,
    }
}

/// Sort in place by the requested key, id ascending as the tie-break.
fn sort_students(students: &mut [Student], sort: StudentSort) {
    students.sort_by(|a, b| {
        let ordering = match sort.field {
            StudentSortField::FirstName => a.first_name().as_ref().cmp(b.first_name().as_ref()),
            StudentSortField::LastName => a.last_name().as_ref().cmp(b.last_name().as_ref()),
            StudentSortField::Id => a.id().as_i64().cmp(&b.id().as_i64()),
        };
        let ordering = match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        ordering.then(a.id().as_i64().cmp(&b.id().as_i64()))
    });
}

fn sort_courses(courses: &mut [Course], sort: CourseSort) {
    courses.sort_by(|a, b| {
        let ordering = match sort.field {
            CourseSortField::CourseName => a.name().as_ref().cmp(b.name().as_ref()),
            CourseSortField::Department => a.department().as_ref().cmp(b.department().as_ref()),
            CourseSortField::Id => a.id().as_i64().cmp(&b.id().as_i64()),
        };
        let ordering = match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        ordering.then(a.id().as_i64().cmp(&b.id().as_i64()))
    });
}

fn paginate<T>(items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = u64::try_from(items.len()).unwrap_or(u64::MAX);
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let items: Vec<T> = items.into_iter().skip(offset).take(PAGE_LEN).collect();
    Page::from_total(items, page, total)
}

/// In-memory implementation of the student repository port.
#[derive(Clone)]
pub struct InMemoryStudentRepository {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryStudentRepository {
    fn state(&self) -> Result<MutexGuard<'_, InMemoryState>, StudentRepositoryError> {
        self.state
            .lock()
            .map_err(|_| StudentRepositoryError::query("state lock poisoned"))
    }
}

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    async fn list(
        &self,
        plan: &StudentListPlan,
        page: PageRequest,
        sort: StudentSort,
    ) -> Result<Page<Student>, StudentRepositoryError> {
        let state = self.state()?;
        let mut matching: Vec<Student> = state
            .all_students()
            .into_iter()
            .filter(|student| student_plan_matches(plan, student))
            .collect();
        sort_students(&mut matching, sort);
        Ok(paginate(matching, page))
    }

    async fn find_by_id(
        &self,
        id: StudentId,
    ) -> Result<Option<Student>, StudentRepositoryError> {
        let state = self.state()?;
        Ok(state
            .students
            .get(&id.as_i64())
            .map(|record| state.student(id.as_i64(), record)))
    }

    async fn find_by_name(
        &self,
        first_name: &FirstName,
        last_name: &LastName,
    ) -> Result<Vec<Student>, StudentRepositoryError> {
        let state = self.state()?;
        Ok(state
            .all_students()
            .into_iter()
            .filter(|student| {
                student.first_name() == first_name && student.last_name() == last_name
            })
            .collect())
    }

    async fn find_by_course_name(
        &self,
        course_name: &CourseName,
    ) -> Result<Vec<Student>, StudentRepositoryError> {
        let state = self.state()?;
        Ok(state
            .all_students()
            .into_iter()
            .filter(|student| enrolled_in_exact(student, course_name.as_ref()))
            .collect())
    }

    async fn insert(&self, draft: &StudentDraft) -> Result<Student, StudentRepositoryError> {
        let mut state = self.state()?;
        state
            .check_courses_exist(draft.courses())
            .map_err(StudentRepositoryError::query)?;

        state.next_student_id += 1;
        let id = state.next_student_id;
        state.students.insert(
            id,
            StudentRecord {
                first_name: draft.first_name().clone(),
                last_name: draft.last_name().clone(),
            },
        );
        state.replace_enrolments(id, draft.courses());

        Ok(Student::new(
            StudentId::new(id),
            draft.first_name().clone(),
            draft.last_name().clone(),
            draft.courses().to_vec(),
        ))
    }

    async fn update(&self, student: &Student) -> Result<Student, StudentRepositoryError> {
        let mut state = self.state()?;
        let id = student.id().as_i64();
        if !state.students.contains_key(&id) {
            return Err(StudentRepositoryError::query("record not found"));
        }
        state
            .check_courses_exist(student.courses())
            .map_err(StudentRepositoryError::query)?;

        state.students.insert(
            id,
            StudentRecord {
                first_name: student.first_name().clone(),
                last_name: student.last_name().clone(),
            },
        );
        state.replace_enrolments(id, student.courses());
        Ok(student.clone())
    }

    async fn delete(&self, id: StudentId) -> Result<bool, StudentRepositoryError> {
        let mut state = self.state()?;
        let student_id = id.as_i64();
        state
            .enrollments
            .retain(|(enrolled, _)| *enrolled != student_id);
        Ok(state.students.remove(&student_id).is_some())
    }
}

/// In-memory implementation of the course repository port.
#[derive(Clone)]
pub struct InMemoryCourseRepository {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryCourseRepository {
    fn state(&self) -> Result<MutexGuard<'_, InMemoryState>, CourseRepositoryError> {
        self.state
            .lock()
            .map_err(|_| CourseRepositoryError::query("state lock poisoned"))
    }
}

#[async_trait]
impl CourseRepository for InMemoryCourseRepository {
    async fn list(
        &self,
        plan: &CourseListPlan,
        page: PageRequest,
        sort: CourseSort,
    ) -> Result<Page<Course>, CourseRepositoryError> {
        let state = self.state()?;
        let mut matching: Vec<Course> = state
            .courses
            .values()
            .filter(|course| course_plan_matches(plan, course))
            .cloned()
            .collect();
        sort_courses(&mut matching, sort);
        Ok(paginate(matching, page))
    }

    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, CourseRepositoryError> {
        let state = self.state()?;
        Ok(state.courses.get(&id.as_i64()).cloned())
    }

    async fn find_by_name(
        &self,
        name: &CourseName,
    ) -> Result<Option<Course>, CourseRepositoryError> {
        let state = self.state()?;
        Ok(state
            .courses
            .values()
            .find(|course| course.name() == name)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Course>, CourseRepositoryError> {
        let state = self.state()?;
        Ok(state.courses.values().cloned().collect())
    }

    async fn insert(&self, draft: &CourseDraft) -> Result<Course, CourseRepositoryError> {
        let mut state = self.state()?;
        if state.course_name_taken(draft.name(), None) {
            return Err(CourseRepositoryError::duplicate_name(draft.name().as_ref()));
        }

        state.next_course_id += 1;
        let id = state.next_course_id;
        let course = Course::new(
            CourseId::new(id),
            draft.name().clone(),
            draft.department().clone(),
        );
        state.courses.insert(id, course.clone());
        Ok(course)
    }

    async fn update(&self, course: &Course) -> Result<Course, CourseRepositoryError> {
        let mut state = self.state()?;
        let id = course.id().as_i64();
        if !state.courses.contains_key(&id) {
            return Err(CourseRepositoryError::query("course not found for update"));
        }
        if state.course_name_taken(course.name(), Some(course.id())) {
            return Err(CourseRepositoryError::duplicate_name(course.name().as_ref()));
        }

        state.courses.insert(id, course.clone());
        Ok(course.clone())
    }

    async fn delete(&self, id: CourseId) -> Result<bool, CourseRepositoryError> {
        let mut state = self.state()?;
        let course_id = id.as_i64();
        state
            .enrollments
            .retain(|(_, enrolled)| *enrolled != course_id);
        Ok(state.courses.remove(&course_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    //! Behavioural coverage shared with the Diesel adapters' semantics.
    use super::*;
    use crate::domain::Department;

    async fn seed_course(
        repo: &InMemoryCourseRepository,
        name: &str,
        department: &str,
    ) -> Course {
        let draft = CourseDraft::new(
            CourseName::new(name).expect("valid course name"),
            Department::new(department).expect("valid department"),
        );
        repo.insert(&draft).await.expect("course insert succeeds")
    }

    async fn seed_student(
        repo: &InMemoryStudentRepository,
        first: &str,
        last: &str,
        courses: Vec<Course>,
    ) -> Student {
        let draft = StudentDraft::new(
            FirstName::new(first).expect("valid first name"),
            LastName::new(last).expect("valid last name"),
            courses,
        );
        repo.insert(&draft).await.expect("student insert succeeds")
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let (students, courses) = in_memory_repositories();
        let maths = seed_course(&courses, "Maths", "Science").await;
        let first = seed_student(&students, "Ada", "Lovelace", vec![maths.clone()]).await;
        let second = seed_student(&students, "Alan", "Turing", Vec::new()).await;

        assert_eq!(maths.id(), CourseId::new(1));
        assert_eq!(first.id(), StudentId::new(1));
        assert_eq!(second.id(), StudentId::new(2));

        let fetched = students
            .find_by_id(first.id())
            .await
            .expect("find succeeds")
            .expect("student present");
        assert_eq!(fetched.courses(), &[maths]);
    }

    #[tokio::test]
    async fn insert_rejects_unknown_course_references() {
        let (students, courses) = in_memory_repositories();
        let maths = seed_course(&courses, "Maths", "Science").await;
        let phantom = Course::new(
            CourseId::new(99),
            maths.name().clone(),
            maths.department().clone(),
        );

        let draft = StudentDraft::new(
            FirstName::new("Ada").expect("valid first name"),
            LastName::new("Lovelace").expect("valid last name"),
            vec![phantom],
        );
        let error = students.insert(&draft).await.expect_err("insert fails");

        assert!(error.to_string().contains("unknown course id 99"));
    }

    #[tokio::test]
    async fn duplicate_course_titles_are_rejected() {
        let (_, courses) = in_memory_repositories();
        let first = seed_course(&courses, "Maths", "Science").await;

        let duplicate = CourseDraft::new(
            CourseName::new("Maths").expect("valid course name"),
            Department::new("Arts").expect("valid department"),
        );
        let error = courses.insert(&duplicate).await.expect_err("insert fails");
        assert_eq!(error, CourseRepositoryError::duplicate_name("Maths"));

        // Updating a course to keep its own title is allowed.
        let renamed = Course::new(
            first.id(),
            first.name().clone(),
            Department::new("Arts").expect("valid department"),
        );
        let updated = courses.update(&renamed).await.expect("update succeeds");
        assert_eq!(updated.department().as_ref(), "Arts");
    }

    #[tokio::test]
    async fn update_rejects_taking_another_courses_title() {
        let (_, courses) = in_memory_repositories();
        let _maths = seed_course(&courses, "Maths", "Science").await;
        let physics = seed_course(&courses, "Physics", "Science").await;

        let clash = Course::new(
            physics.id(),
            CourseName::new("Maths").expect("valid course name"),
            physics.department().clone(),
        );
        let error = courses.update(&clash).await.expect_err("update fails");

        assert_eq!(error, CourseRepositoryError::duplicate_name("Maths"));
    }

    #[tokio::test]
    async fn course_delete_cascades_into_enrolments() {
        let (students, courses) = in_memory_repositories();
        let maths = seed_course(&courses, "Maths", "Science").await;
        let art = seed_course(&courses, "Art History", "Arts").await;
        let ada = seed_student(&students, "Ada", "Lovelace", vec![maths.clone(), art.clone()])
            .await;

        assert!(courses.delete(maths.id()).await.expect("delete succeeds"));
        assert!(!courses.delete(maths.id()).await.expect("second delete succeeds"));

        let fetched = students
            .find_by_id(ada.id())
            .await
            .expect("find succeeds")
            .expect("student present");
        assert_eq!(fetched.courses(), &[art]);
    }

    #[tokio::test]
    async fn student_delete_removes_their_enrolments() {
        let (students, courses) = in_memory_repositories();
        let maths = seed_course(&courses, "Maths", "Science").await;
        let ada = seed_student(&students, "Ada", "Lovelace", vec![maths.clone()]).await;

        assert!(students.delete(ada.id()).await.expect("delete succeeds"));

        let name = CourseName::new("Maths").expect("valid course name");
        let enrolled = students
            .find_by_course_name(&name)
            .await
            .expect("query succeeds");
        assert!(enrolled.is_empty());
        assert!(courses
            .find_by_id(maths.id())
            .await
            .expect("find succeeds")
            .is_some());
    }

    #[tokio::test]
    async fn substring_plan_lists_each_student_once() {
        let (students, courses) = in_memory_repositories();
        let structures = seed_course(&courses, "Data Structures", "Engineering").await;
        let databases = seed_course(&courses, "Databases", "Engineering").await;
        let ada = seed_student(
            &students,
            "Ada",
            "Lovelace",
            vec![structures.clone(), databases.clone()],
        )
        .await;
        let _alan = seed_student(&students, "Alan", "Turing", vec![databases]).await;

        let plan = StudentListPlan::ByCourseContains {
            course_name: "Data".to_owned(),
        };
        let page = students
            .list(&plan, PageRequest::new(0), StudentSort::default())
            .await
            .expect("list succeeds");

        let ids: Vec<StudentId> = page.items.iter().map(Student::id).collect();
        assert_eq!(ids, vec![ada.id(), StudentId::new(2)]);
        assert_eq!(page.total_pages, 1);
    }

    #[tokio::test]
    async fn listing_paginates_in_fixed_pages() {
        let (students, _) = in_memory_repositories();
        for index in 0..6 {
            seed_student(&students, &format!("Student{index}"), "Roster", Vec::new()).await;
        }

        let first = students
            .list(
                &StudentListPlan::All,
                PageRequest::new(0),
                StudentSort::default(),
            )
            .await
            .expect("list succeeds");
        let second = students
            .list(
                &StudentListPlan::All,
                PageRequest::new(1),
                StudentSort::default(),
            )
            .await
            .expect("list succeeds");
        let beyond = students
            .list(
                &StudentListPlan::All,
                PageRequest::new(5),
                StudentSort::default(),
            )
            .await
            .expect("list succeeds");

        assert_eq!(first.items.len(), 5);
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.total_pages, 2);
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total_pages, 2);
    }

    #[tokio::test]
    async fn sorting_descends_with_id_tie_break() {
        let (students, _) = in_memory_repositories();
        let _amy = seed_student(&students, "Amy", "Adams", Vec::new()).await;
        let zoe = seed_student(&students, "Zoe", "Church", Vec::new()).await;
        let second_amy = seed_student(&students, "Amy", "Baker", Vec::new()).await;

        let sort = StudentSort {
            field: StudentSortField::FirstName,
            direction: SortDirection::Desc,
        };
        let page = students
            .list(&StudentListPlan::All, PageRequest::new(0), sort)
            .await
            .expect("list succeeds");

        let ids: Vec<StudentId> = page.items.iter().map(Student::id).collect();
        assert_eq!(ids, vec![zoe.id(), StudentId::new(1), second_amy.id()]);
    }

    #[tokio::test]
    async fn update_requires_an_existing_student() {
        let (students, _) = in_memory_repositories();
        let ghost = Student::new(
            StudentId::new(42),
            FirstName::new("Ada").expect("valid first name"),
            LastName::new("Lovelace").expect("valid last name"),
            Vec::new(),
        );

        let error = students.update(&ghost).await.expect_err("update fails");

        assert!(error.to_string().contains("record not found"));
    }
}
