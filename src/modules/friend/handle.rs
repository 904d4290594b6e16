use actix_web::{get, post, web, HttpRequest};

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::friend::{
        model::{
            FriendRequestResponse, FriendsList, PendingRequestsList, RespondFriendRequestBody,
            SendFriendRequestBody,
        },
        service::FriendService,
    },
    utils::ValidatedJson,
};

#[post("/send-friend-request")]
pub async fn send_friend_request(
    friend_service: web::Data<FriendService>,
    body: ValidatedJson<SendFriendRequestBody>,
    req: HttpRequest,
) -> Result<success::Success<FriendRequestResponse>, error::Error> {
    let sender_id = get_claims(&req)?.sub;
    let receiver_id =
        body.0.to_user_id.ok_or(error::Error::bad_request("Missing 'to_user_id' parameter"))?;
    let request = friend_service.send_friend_request(sender_id, receiver_id).await?;

    Ok(success::Success::created(Some(request)).message("Friend request sent."))
}

#[post("/respond-friend-request")]
pub async fn respond_friend_request(
    friend_service: web::Data<FriendService>,
    body: ValidatedJson<RespondFriendRequestBody>,
    req: HttpRequest,
) -> Result<success::Success<FriendRequestResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let RespondFriendRequestBody { request_id, action } = body.0;
    let (Some(request_id), Some(action)) = (request_id, action) else {
        return Err(error::Error::bad_request("Request ID and action are required."));
    };

    let response =
        friend_service.respond_to_friend_request(user_id, request_id, &action).await?;

    let message = match response {
        Some(_) => "Friend request accepted.",
        None => "Friend request rejected.",
    };
    Ok(success::Success::ok(response).message(message))
}

#[get("/friends")]
pub async fn list_friends(
    friend_service: web::Data<FriendService>,
    req: HttpRequest,
) -> Result<success::Success<FriendsList>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let friends = friend_service.get_friends(user_id).await?;

    Ok(success::Success::ok(Some(FriendsList { friends })).message("Friends retrieved successfully"))
}

#[get("/pending-requests")]
pub async fn list_pending_requests(
    friend_service: web::Data<FriendService>,
    req: HttpRequest,
) -> Result<success::Success<PendingRequestsList>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let pending_requests = friend_service.get_pending_summaries(user_id).await?;

    Ok(success::Success::ok(Some(PendingRequestsList { pending_requests }))
        .message("Pending requests retrieved successfully"))
}

#[get("/pending-friend-requests")]
pub async fn list_pending_friend_requests(
    friend_service: web::Data<FriendService>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendRequestResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let requests = friend_service.get_pending_requests(user_id).await.map_err(|e| {
        log::error!("Error retrieving pending requests for {user_id}: {e:?}");
        error::Error::InternalServer
    })?;

    Ok(success::Success::ok(Some(requests)).message("Pending friend requests retrieved successfully"))
}
