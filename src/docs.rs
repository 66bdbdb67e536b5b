use utoipa::OpenApi;

use crate::utils::errors::ErrorResponse;
use rollbook_models::guardians::{CreateGuardianDto, Guardian, GuardianWithUser};
use rollbook_models::students::{CreateStudentDto, Student, StudentWithUser, UpdateStudentDto};
use rollbook_models::teachers::{CreateTeacherDto, Teacher, TeacherWithUser, UpdateTeacherDto};
use rollbook_models::users::{CreateUserDto, User};
use rollbook_models::value_types::Gender;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::users::controller::create_user,
        crate::modules::guardians::controller::create_guardian,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::get_teacher,
        crate::modules::teachers::controller::update_teacher,
        crate::modules::teachers::controller::delete_teacher,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
    ),
    components(
        schemas(
            User,
            CreateUserDto,
            Gender,
            Guardian,
            GuardianWithUser,
            CreateGuardianDto,
            Teacher,
            TeacherWithUser,
            CreateTeacherDto,
            UpdateTeacherDto,
            Student,
            StudentWithUser,
            CreateStudentDto,
            UpdateStudentDto,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Users", description = "Standalone user account management"),
        (name = "Guardians", description = "Guardian management"),
        (name = "Teachers", description = "Teacher management"),
        (name = "Students", description = "Student management and guardian provisioning"),
    )
)]
pub struct ApiDoc;
