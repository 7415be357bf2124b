use shared::{
    AuthResponse, LoginRequest, RegisterRequest, UpdatePasswordRequest, UpdateProfileRequest, User as SharedUser,
    UserResponse,
};

use crate::domain::commands::accounts::{
    AuthResult, ChangePasswordCommand, LoginCommand, RegisterCommand, UpdateProfileCommand,
};
use crate::domain::models::user::User as DomainUser;

/// Mapper between user DTOs and domain users. Credentials never cross it.
pub struct UserMapper;

impl UserMapper {
    pub fn to_dto(domain: DomainUser) -> SharedUser {
        SharedUser {
            id: domain.id,
            username: domain.username,
            email: domain.email,
            role: domain.role,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }

    pub fn to_user_response(domain: DomainUser) -> UserResponse {
        UserResponse { user: Self::to_dto(domain) }
    }

    pub fn to_auth_response(result: AuthResult) -> AuthResponse {
        AuthResponse {
            token: result.token,
            user: Self::to_dto(result.user),
        }
    }

    pub fn to_register_command(request: RegisterRequest) -> RegisterCommand {
        RegisterCommand {
            username: request.username,
            email: request.email,
            password: request.password,
            role: request.role,
        }
    }

    pub fn to_login_command(request: LoginRequest) -> LoginCommand {
        LoginCommand {
            email: request.email,
            password: request.password,
        }
    }

    pub fn to_update_profile_command(request: UpdateProfileRequest) -> UpdateProfileCommand {
        UpdateProfileCommand {
            username: request.username,
            email: request.email,
        }
    }

    pub fn to_change_password_command(request: UpdatePasswordRequest) -> ChangePasswordCommand {
        ChangePasswordCommand {
            current_password: request.current_password,
            new_password: request.new_password,
        }
    }
}
