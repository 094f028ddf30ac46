//! Domain to wire conversions.

use quill_core::domain::{
    Category, PostChanges, PostDetails, PostStatus, Principal, Tag, User, WithPostCount,
};
use quill_shared::dto::{
    AuthorDto, NamedRef, PostRequest, PostResponse, PostStatusDto, TaxonomyResponse, UserResponse,
};

pub fn status_to_dto(status: PostStatus) -> PostStatusDto {
    match status {
        PostStatus::Draft => PostStatusDto::Draft,
        PostStatus::Published => PostStatusDto::Published,
    }
}

pub fn status_from_dto(status: PostStatusDto) -> PostStatus {
    match status {
        PostStatusDto::Draft => PostStatus::Draft,
        PostStatusDto::Published => PostStatus::Published,
    }
}

pub fn post_changes(req: PostRequest) -> PostChanges {
    PostChanges {
        title: req.title,
        content: req.content,
        status: status_from_dto(req.status),
        category_id: req.category_id,
        tag_ids: req.tag_ids,
    }
}

pub fn post_response(details: PostDetails) -> PostResponse {
    let PostDetails {
        post,
        author,
        category,
        tags,
    } = details;

    PostResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        author: AuthorDto {
            id: author.id,
            name: author.name,
        },
        category: named_ref(category.id, category.name),
        tags: tags.into_iter().map(|t| named_ref(t.id, t.name)).collect(),
        reading_time: post.reading_time,
        status: status_to_dto(post.status),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

pub fn user_response(user: User, principal: &Principal) -> UserResponse {
    UserResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        authorities: principal.authorities.iter().cloned().collect(),
        created_at: user.created_at,
    }
}

pub fn category_response(item: WithPostCount<Category>) -> TaxonomyResponse {
    TaxonomyResponse {
        id: item.entity.id,
        name: item.entity.name,
        post_count: item.post_count,
    }
}

pub fn tag_response(item: WithPostCount<Tag>) -> TaxonomyResponse {
    TaxonomyResponse {
        id: item.entity.id,
        name: item.entity.name,
        post_count: item.post_count,
    }
}

pub fn named_ref(id: uuid::Uuid, name: String) -> NamedRef {
    NamedRef { id, name }
}
